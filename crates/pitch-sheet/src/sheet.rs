//! Sheet composition and persistence
//!
//! Orchestrates one generation request as a pure pipeline: plan the layout,
//! rasterize each segment, paste tiles, labels, and the header onto the page
//! canvas, then hand the finished canvas to the sink. Nothing is cached
//! across requests, and nothing is written unless the whole canvas composes.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbImage, imageops};
use tracing::debug;

use crate::Result;
use crate::layout::plan_layout;
use crate::options::SheetOptions;
use crate::raster::{BLACK, WHITE, render_line_tile};
use crate::text::{HorizontalAlign, TextRenderer, VerticalAlign};
use crate::types::{PageSpec, RectPx};

/// Outline stroke around each segment, in pixels
const OUTLINE_WIDTH: u32 = 2;

/// Compose the full pitch sheet canvas.
///
/// Without a text renderer the sheet carries line patterns and outlines
/// only; labels and the header are skipped. A collaborator failure aborts
/// the whole composition, so a partial sheet never reaches the sink.
pub fn compose_pitch_sheet(
    page: &PageSpec,
    options: &SheetOptions,
    text: Option<&dyn TextRenderer>,
) -> Result<RgbImage> {
    let plan = plan_layout(page, options)?;
    let size = page.size_px();
    let mut canvas = RgbImage::from_pixel(size.width, size.height, WHITE);

    if let Some(renderer) = text {
        let title = renderer.render_block(
            "Pitch Sheet",
            plan.header_px.size(),
            options.header_font_ratio,
            HorizontalAlign::Center,
            VerticalAlign::Top,
        )?;
        paste_text(&mut canvas, &title, plan.header_px.x, plan.header_px.y);

        let info = page_info_text(page);
        let info_block = renderer.render_block(
            &info,
            plan.header_px.size(),
            options.info_font_ratio,
            HorizontalAlign::Right,
            VerticalAlign::Bottom,
        )?;
        paste_text(&mut canvas, &info_block, plan.header_px.x, plan.header_px.y);
    }

    for placement in &plan.segments {
        let tile = render_line_tile(
            placement.segment_in.size(),
            placement.segment_px.size(),
            placement.lpi,
            page.dpi(),
        )?;
        imageops::replace(
            &mut canvas,
            &tile,
            i64::from(placement.segment_px.x),
            i64::from(placement.segment_px.y),
        );

        if let Some(renderer) = text {
            let label = renderer.render_block(
                &format!("{:.3}", placement.lpi),
                placement.label_px.size(),
                options.label_font_ratio,
                HorizontalAlign::Left,
                VerticalAlign::Middle,
            )?;
            paste_text(&mut canvas, &label, placement.label_px.x, placement.label_px.y);
        }

        if options.segment_outline {
            stroke_rect(&mut canvas, placement.segment_px, OUTLINE_WIDTH);
        }
    }

    debug!(
        segments = plan.segments.len(),
        width = size.width,
        height = size.height,
        "composed pitch sheet"
    );
    Ok(canvas)
}

/// Encode the canvas and write it to `path` in a single operation: either
/// the complete file lands or nothing does.
///
/// The format follows the destination extension (PNG by convention).
pub async fn save_canvas(canvas: RgbImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let format = ImageFormat::from_path(&path)?;

    // Encoding is CPU-bound
    let bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(canvas).write_to(&mut Cursor::new(&mut bytes), format)?;
        Ok(bytes)
    })
    .await??;

    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

/// One-shot pipeline: plan, rasterize, composite, persist.
pub async fn generate_pitch_sheet<R>(
    page: &PageSpec,
    options: &SheetOptions,
    renderer: Option<R>,
    output_path: impl AsRef<Path>,
) -> Result<()>
where
    R: TextRenderer + 'static,
{
    options.validate()?;

    let page = page.clone();
    let options = options.clone();
    let canvas = tokio::task::spawn_blocking(move || {
        let text = renderer.as_ref().map(|r| r as &dyn TextRenderer);
        compose_pitch_sheet(&page, &options, text)
    })
    .await??;

    save_canvas(canvas, output_path).await
}

fn page_info_text(page: &PageSpec) -> String {
    let dims = page.display_dimensions();
    let dpi = page.dpi();
    let res = page.size_px();
    format!(
        "Page dimensions ({}): {:.3} x {:.3}\nDPI: {} x {}\nResolution: {} x {}",
        page.unit().label(),
        dims.width,
        dims.height,
        dpi.horizontal,
        dpi.vertical,
        res.width,
        res.height
    )
}

/// Paste a text block, keeping the darker pixel where blocks overlap so the
/// header title and info lines can share one region.
fn paste_text(canvas: &mut RgbImage, block: &RgbImage, x: u32, y: u32) {
    for (bx, by, pixel) in block.enumerate_pixels() {
        let cx = x + bx;
        let cy = y + by;
        if cx >= canvas.width() || cy >= canvas.height() {
            continue;
        }
        let dst = canvas.get_pixel_mut(cx, cy);
        for channel in 0..3 {
            dst.0[channel] = dst.0[channel].min(pixel.0[channel]);
        }
    }
}

fn fill_rect(canvas: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32) {
    let x1 = x1.min(canvas.width());
    let y1 = y1.min(canvas.height());
    for y in y0..y1 {
        for x in x0..x1 {
            canvas.put_pixel(x, y, BLACK);
        }
    }
}

/// Stroke an outline just inside the rectangle bounds
fn stroke_rect(canvas: &mut RgbImage, rect: RectPx, width: u32) {
    let right = rect.right();
    let bottom = rect.bottom();

    fill_rect(canvas, rect.x, rect.y, right, rect.y + width);
    fill_rect(canvas, rect.x, bottom.saturating_sub(width), right, bottom);
    fill_rect(canvas, rect.x, rect.y, rect.x + width, bottom);
    fill_rect(canvas, right.saturating_sub(width), rect.y, right, bottom);
}
