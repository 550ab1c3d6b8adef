//! Text rendering collaborator
//!
//! The compositor only needs raster blocks of a requested pixel size with
//! anchored text. Font selection and loading stay with the caller; the core
//! never goes looking for font files on its own.

use image::{Rgb, RgbImage};
use rusttype::{Font, Scale, point};

use crate::types::SizePx;
use crate::{PitchSheetError, Result};

/// Horizontal anchor of a text block within its box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

/// Vertical anchor of a text block within its box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

/// Renders text into raster blocks for the compositor.
pub trait TextRenderer: Send + Sync {
    /// Render `text` as black-on-white into a block of exactly `size`.
    ///
    /// The font height is `font_height_ratio * size.height` pixels.
    /// Multi-line text splits on `\n`; every line is anchored horizontally
    /// per `h_align`, and the whole block vertically per `v_align`. Glyphs
    /// falling outside the box are clipped, not an error.
    fn render_block(
        &self,
        text: &str,
        size: SizePx,
        font_height_ratio: f64,
        h_align: HorizontalAlign,
        v_align: VerticalAlign,
    ) -> Result<RgbImage>;
}

/// TrueType renderer over caller-supplied font bytes
pub struct TrueTypeTextRenderer {
    font: Font<'static>,
}

impl TrueTypeTextRenderer {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| PitchSheetError::Resource("Failed to parse font data".to_string()))?;
        Ok(Self { font })
    }

    fn line_width(&self, line: &str, scale: Scale) -> f32 {
        self.font
            .layout(line, scale, point(0.0, 0.0))
            .last()
            .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }
}

impl TextRenderer for TrueTypeTextRenderer {
    fn render_block(
        &self,
        text: &str,
        size: SizePx,
        font_height_ratio: f64,
        h_align: HorizontalAlign,
        v_align: VerticalAlign,
    ) -> Result<RgbImage> {
        let mut block = RgbImage::from_pixel(size.width, size.height, Rgb([255, 255, 255]));
        if size.width == 0 || size.height == 0 {
            return Ok(block);
        }

        let font_height = (font_height_ratio * f64::from(size.height)).max(1.0) as f32;
        let scale = Scale::uniform(font_height);
        let v_metrics = self.font.v_metrics(scale);
        let line_height = v_metrics.ascent - v_metrics.descent + v_metrics.line_gap;

        let lines: Vec<&str> = text.lines().collect();
        let text_height = line_height * lines.len() as f32;
        let top = match v_align {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Middle => (size.height as f32 - text_height) / 2.0,
            VerticalAlign::Bottom => size.height as f32 - text_height,
        };

        for (line_index, line) in lines.iter().enumerate() {
            let baseline = top + v_metrics.ascent + line_index as f32 * line_height;
            let x0 = match h_align {
                HorizontalAlign::Left => 0.0,
                HorizontalAlign::Center => (size.width as f32 - self.line_width(line, scale)) / 2.0,
                HorizontalAlign::Right => size.width as f32 - self.line_width(line, scale),
            };

            for glyph in self.font.layout(line, scale, point(x0, baseline)) {
                let Some(bb) = glyph.pixel_bounding_box() else {
                    continue;
                };
                glyph.draw(|gx, gy, coverage| {
                    let px = bb.min.x + gx as i32;
                    let py = bb.min.y + gy as i32;
                    if px < 0 || py < 0 || px as u32 >= size.width || py as u32 >= size.height {
                        return;
                    }
                    let shade = (255.0 * (1.0 - coverage)) as u8;
                    let pixel = block.get_pixel_mut(px as u32, py as u32);
                    if shade < pixel.0[0] {
                        *pixel = Rgb([shade, shade, shade]);
                    }
                });
            }
        }

        Ok(block)
    }
}
