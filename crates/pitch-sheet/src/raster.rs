//! Line-frequency rasterizer
//!
//! Drawing `lpi` lines per inch at `dpi` pixels per inch generally needs a
//! non-integer pixel spacing. Rounding every line's x coordinate to the
//! nearest pixel accumulates error and visibly drifts off frequency across a
//! wide band, so the pattern is rendered at an integer spacing first and then
//! resampled by the true-to-integer spacing ratio. That moves the rounding
//! error into smooth sub-pixel interpolation instead of per-line jitter.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use tracing::debug;

use crate::types::{Dpi, SizeIn, SizePx};
use crate::{PitchSheetError, Result};

/// A rendered periodic line pattern of an exact pixel size
pub type LineTile = RgbImage;

pub(crate) const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub(crate) const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Render a tile of vertical lines whose true average frequency is `lpi`.
///
/// `size_in` and `size_px` describe the same physical region in inches and
/// pixels. The tile is rendered oversized at an integer line spacing of
/// `ceil(dpi / lpi)` pixels, resampled horizontally (bilinear) by the ratio
/// of true to integer spacing, and cropped to `size_px`. The crop is always
/// anchored at the left edge, so a line sits at x = 0 of every tile.
///
/// Pure function: identical inputs produce pixel-identical tiles.
pub fn render_line_tile(size_in: SizeIn, size_px: SizePx, lpi: f64, dpi: Dpi) -> Result<LineTile> {
    if !lpi.is_finite() || lpi <= 0.0 {
        return Err(PitchSheetError::Frequency(format!(
            "Line frequency must be positive, got {lpi}"
        )));
    }
    if !dpi.horizontal.is_finite() || dpi.horizontal <= 0.0 {
        return Err(PitchSheetError::Frequency(format!(
            "Horizontal dpi must be positive, got {}",
            dpi.horizontal
        )));
    }
    if !size_in.width.is_finite() || size_in.width <= 0.0 {
        return Err(PitchSheetError::Frequency(format!(
            "Tile width must be positive, got {} in",
            size_in.width
        )));
    }
    if size_px.width == 0 || size_px.height == 0 {
        return Err(PitchSheetError::Frequency(format!(
            "Degenerate tile size {}x{} px",
            size_px.width, size_px.height
        )));
    }

    // True (generally fractional) pixels per line
    let ppl = dpi.horizontal / lpi;
    // Integer pre-render spacing, never narrower than the true spacing
    let line_spacing = ppl.ceil().max(1.0) as u32;
    // Enough lines to cover the band at the true frequency
    let line_count = (size_in.width * lpi).ceil().max(1.0) as u32;
    let scale = ppl / f64::from(line_spacing);

    // The crop keeps only the left `size_px.width` columns of the resampled
    // tile, so the pre-tile never needs more columns than map onto that
    // window. The cap keeps a very coarse pitch (one line wider than the
    // band) from allocating in proportion to the line spacing.
    let full_width = u64::from(line_spacing) * u64::from(line_count);
    let window_width = ((f64::from(size_px.width) + 2.0) / scale).ceil() as u64;
    let pre_width = full_width.min(window_width).max(1) as u32;

    let mut pre = RgbImage::from_pixel(pre_width, size_px.height, WHITE);
    for x in (0..pre_width).step_by(line_spacing as usize) {
        for y in 0..size_px.height {
            pre.put_pixel(x, y, BLACK);
        }
    }

    // Resample so the average spacing equals `ppl` exactly. The target width
    // is clamped up to the crop width so the crop window always exists.
    let corrected_width = ((f64::from(pre_width) * scale).round() as u32).max(size_px.width);
    debug!(
        lpi,
        ppl,
        line_spacing,
        line_count,
        pre_width,
        corrected_width,
        "rendering line tile"
    );
    let resampled = imageops::resize(&pre, corrected_width, size_px.height, FilterType::Triangle);

    Ok(imageops::crop_imm(&resampled, 0, 0, size_px.width, size_px.height).to_image())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DARK: u8 = 200;

    /// Count dark runs along the middle scanline
    fn count_lines(tile: &LineTile) -> usize {
        let y = tile.height() / 2;
        let mut runs = 0;
        let mut in_run = false;
        for x in 0..tile.width() {
            let dark = tile.get_pixel(x, y).0[0] < DARK;
            if dark && !in_run {
                runs += 1;
            }
            in_run = dark;
        }
        runs
    }

    #[test]
    fn test_tile_matches_requested_size() {
        let tile = render_line_tile(
            SizeIn::new(9.45, 0.46),
            SizePx::new(3402, 168),
            74.6,
            Dpi::uniform(360.0),
        )
        .unwrap();
        assert_eq!(tile.width(), 3402);
        assert_eq!(tile.height(), 168);
    }

    #[test]
    fn test_idempotent() {
        let a = render_line_tile(
            SizeIn::new(2.0, 0.5),
            SizePx::new(720, 180),
            75.3,
            Dpi::uniform(360.0),
        )
        .unwrap();
        let b = render_line_tile(
            SizeIn::new(2.0, 0.5),
            SizePx::new(720, 180),
            75.3,
            Dpi::uniform(360.0),
        )
        .unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_true_frequency_across_wide_tile() {
        // 10 in at 75 lpi: 750 lines, non-integer spacing of 4.8 px
        let tile = render_line_tile(
            SizeIn::new(10.0, 0.5),
            SizePx::new(3600, 180),
            75.0,
            Dpi::uniform(360.0),
        )
        .unwrap();
        let lines = count_lines(&tile);
        assert!((749..=751).contains(&lines), "counted {lines} lines");
    }

    #[test]
    fn test_line_anchored_at_left_edge() {
        let tile = render_line_tile(
            SizeIn::new(2.0, 0.25),
            SizePx::new(720, 90),
            60.0,
            Dpi::uniform(360.0),
        )
        .unwrap();
        assert!(tile.get_pixel(0, 45).0[0] < DARK);
    }

    #[test]
    fn test_one_line_per_pixel() {
        // lpi == dpi degenerates to a solid tile but must stay valid
        let tile = render_line_tile(
            SizeIn::new(1.0, 0.25),
            SizePx::new(360, 90),
            360.0,
            Dpi::uniform(360.0),
        )
        .unwrap();
        assert_eq!(tile.width(), 360);
        assert!(tile.get_pixel(0, 45).0[0] < DARK);
        assert!(tile.get_pixel(180, 45).0[0] < DARK);
    }

    #[test]
    fn test_coarse_pitch_stays_bounded() {
        // One line spans far more than the tile; allocation must stay
        // proportional to the requested size, not to the line spacing
        let tile = render_line_tile(
            SizeIn::new(1.0, 0.25),
            SizePx::new(360, 90),
            0.01,
            Dpi::uniform(360.0),
        )
        .unwrap();
        assert_eq!(tile.width(), 360);
        assert_eq!(tile.height(), 90);
        // only the single left-anchored line is visible
        assert!(tile.get_pixel(0, 45).0[0] < DARK);
        assert!(tile.get_pixel(359, 45).0[0] >= DARK);
    }

    #[test]
    fn test_invalid_frequency_rejected() {
        let size_in = SizeIn::new(1.0, 1.0);
        let size_px = SizePx::new(100, 100);
        let dpi = Dpi::uniform(100.0);

        assert!(matches!(
            render_line_tile(size_in, size_px, 0.0, dpi),
            Err(PitchSheetError::Frequency(_))
        ));
        assert!(matches!(
            render_line_tile(size_in, size_px, -5.0, dpi),
            Err(PitchSheetError::Frequency(_))
        ));
        assert!(matches!(
            render_line_tile(size_in, size_px, 75.0, Dpi::uniform(0.0)),
            Err(PitchSheetError::Frequency(_))
        ));
        assert!(matches!(
            render_line_tile(size_in, SizePx::new(0, 100), 75.0, dpi),
            Err(PitchSheetError::Frequency(_))
        ));
    }
}
