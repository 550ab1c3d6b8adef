//! Page geometry for the pitch sheet
//!
//! Pure geometry, no image data: converts a page description and sheet
//! options into the rectangles of the header band, the label column, and
//! every pitch segment, in both inches and pixels.

use tracing::debug;

use crate::options::SheetOptions;
use crate::types::{PageSpec, RectIn, RectPx};
use crate::{PitchSheetError, Result};

/// Placement of one pitch test band and its label
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPlacement {
    /// Band index, 0 at the top of the page
    pub index: usize,
    /// Line frequency of this band in lines per inch
    pub lpi: f64,
    pub segment_in: RectIn,
    pub segment_px: RectPx,
    pub label_in: RectIn,
    pub label_px: RectPx,
}

/// Complete placement plan for one sheet
///
/// Recomputed for every generation request; nothing is cached across calls.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub header_in: RectIn,
    pub header_px: RectPx,
    /// Segments in top-to-bottom page order
    pub segments: Vec<SegmentPlacement>,
}

/// Linearly sweep the pitch range across the segment indices.
///
/// Index 0 maps to `low` and index `segments - 1` to `high` exactly; a single
/// segment collapses to `low`.
pub fn interpolate_lpi(low: f64, high: f64, index: usize, segments: usize) -> f64 {
    if segments <= 1 {
        low
    } else {
        low + (high - low) * index as f64 / (segments - 1) as f64
    }
}

/// Compute the placement plan for every segment, label, and the header.
///
/// The drawable area is the page minus margins. The header takes the top
/// `header_height_ratio` fraction of it; the rest is split into `segments`
/// equal bands, each keeping `1 - separation` of its height for the test
/// pattern. Labels share their segment's top and height on the left
/// `label_width_ratio` fraction of the drawable width.
pub fn plan_layout(page: &PageSpec, options: &SheetOptions) -> Result<LayoutPlan> {
    options.validate()?;

    let size = page.size_in();
    let margins = &options.margins;
    if margins.horizontal() >= size.width {
        return Err(PitchSheetError::Config(format!(
            "Left + right margins ({:.3} in) consume the page width ({:.3} in)",
            margins.horizontal(),
            size.width
        )));
    }
    if margins.vertical() >= size.height {
        return Err(PitchSheetError::Config(format!(
            "Top + bottom margins ({:.3} in) consume the page height ({:.3} in)",
            margins.vertical(),
            size.height
        )));
    }

    let dpi = page.dpi();
    let drawable = RectIn::new(
        margins.left,
        margins.top,
        size.width - margins.horizontal(),
        size.height - margins.vertical(),
    );

    let header_in = RectIn::new(
        drawable.x,
        drawable.y,
        drawable.width,
        options.header_height_ratio * drawable.height,
    );

    let label_width = options.label_width_ratio * drawable.width;
    let segment_width = drawable.width - label_width;
    let band_height = (drawable.height - header_in.height) / options.segments as f64;
    let segment_height = band_height * (1.0 - options.separation);

    debug!(
        drawable_width_in = drawable.width,
        drawable_height_in = drawable.height,
        band_height_in = band_height,
        segment_width_in = segment_width,
        "planned sheet geometry"
    );

    let mut segments = Vec::with_capacity(options.segments);
    for index in 0..options.segments {
        let top = header_in.bottom() + index as f64 * band_height;
        let segment_in = RectIn::new(drawable.x + label_width, top, segment_width, segment_height);
        let label_in = RectIn::new(drawable.x, top, label_width, segment_height);

        segments.push(SegmentPlacement {
            index,
            lpi: interpolate_lpi(page.low_pitch(), page.high_pitch(), index, options.segments),
            segment_px: segment_in.to_px(dpi),
            segment_in,
            label_px: label_in.to_px(dpi),
            label_in,
        });
    }

    Ok(LayoutPlan {
        header_px: header_in.to_px(dpi),
        header_in,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Dpi, PageUnit, SizeIn};

    fn letter_page() -> PageSpec {
        PageSpec::new(
            74.0,
            76.0,
            SizeIn::new(11.0, 8.5),
            PageUnit::Inches,
            Dpi::uniform(360.0),
        )
        .unwrap()
    }

    #[test]
    fn test_lpi_endpoints_exact() {
        assert_eq!(interpolate_lpi(74.0, 76.0, 0, 11), 74.0);
        assert_eq!(interpolate_lpi(74.0, 76.0, 10, 11), 76.0);
        assert_eq!(interpolate_lpi(74.0, 76.0, 5, 11), 75.0);
    }

    #[test]
    fn test_lpi_single_segment() {
        assert_eq!(interpolate_lpi(74.0, 76.0, 0, 1), 74.0);
    }

    #[test]
    fn test_lpi_monotonic() {
        let mut last = f64::NEG_INFINITY;
        for i in 0..37 {
            let lpi = interpolate_lpi(40.0, 161.0, i, 37);
            assert!(lpi >= last);
            last = lpi;
        }
    }

    #[test]
    fn test_drawable_and_header_geometry() {
        let plan = plan_layout(&letter_page(), &SheetOptions::default()).unwrap();

        // 11x8.5 page with 0.25 margins: drawable 10.5 x 8.0
        assert!((plan.header_in.x - 0.25).abs() < 1e-9);
        assert!((plan.header_in.y - 0.25).abs() < 1e-9);
        assert!((plan.header_in.width - 10.5).abs() < 1e-9);
        // header ratio 0.2 of 8.0
        assert!((plan.header_in.height - 1.6).abs() < 1e-9);

        // band area 10.5 x 6.4 split across 11 segments
        let band_height = 6.4 / 11.0;
        let first = &plan.segments[0];
        assert!((first.segment_in.y - (0.25 + 1.6)).abs() < 1e-9);
        assert!((first.segment_in.height - band_height * 0.8).abs() < 1e-9);

        // label column is the left 10% of the drawable width
        assert!((first.label_in.width - 1.05).abs() < 1e-9);
        assert!((first.segment_in.x - (0.25 + 1.05)).abs() < 1e-9);
        assert!((first.segment_in.width - 9.45).abs() < 1e-9);
        assert!((first.label_in.right() - first.segment_in.x).abs() < 1e-9);
    }

    #[test]
    fn test_bands_tile_available_height() {
        let options = SheetOptions::default();
        let plan = plan_layout(&letter_page(), &options).unwrap();

        let band_height = (8.0 - 1.6) / options.segments as f64;
        for pair in plan.segments.windows(2) {
            let gap = pair[1].segment_in.y - pair[0].segment_in.y;
            assert!((gap - band_height).abs() < 1e-9);
        }

        let last = plan.segments.last().unwrap();
        let used = last.segment_in.y + band_height - plan.header_in.y;
        // header + all bands fill the drawable height
        assert!((used - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_segments_share_pixel_extent() {
        let plan = plan_layout(&letter_page(), &SheetOptions::default()).unwrap();
        let first = &plan.segments[0];
        for placement in &plan.segments {
            assert_eq!(placement.segment_px.x, first.segment_px.x);
            assert_eq!(placement.segment_px.width, first.segment_px.width);
            assert_eq!(placement.label_px.x, first.label_px.x);
            assert_eq!(placement.label_px.width, first.label_px.width);
        }
    }

    #[test]
    fn test_margins_exceeding_page_rejected() {
        let mut options = SheetOptions::default();
        options.margins = crate::types::Margins::new(0.25, 6.0, 0.25, 5.0);
        let result = plan_layout(&letter_page(), &options);
        match result {
            Err(PitchSheetError::Config(msg)) => assert!(msg.contains("page width")),
            _ => panic!("Expected Config error"),
        }
    }
}
