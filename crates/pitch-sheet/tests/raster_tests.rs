use pitch_sheet::*;

const DARK: u8 = 200;

fn count_lines(tile: &LineTile, y: u32) -> usize {
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
fn test_every_planned_segment_renders_at_exact_size() {
    let page = PageSpec::new(
        74.0,
        76.0,
        SizeIn::new(11.0, 8.5),
        PageUnit::Inches,
        Dpi::uniform(360.0),
    )
    .unwrap();
    let plan = plan_layout(&page, &SheetOptions::default()).unwrap();

    for placement in &plan.segments {
        let tile = render_line_tile(
            placement.segment_in.size(),
            placement.segment_px.size(),
            placement.lpi,
            page.dpi(),
        )
        .unwrap();
        assert_eq!(tile.width(), placement.segment_px.width);
        assert_eq!(tile.height(), placement.segment_px.height);
    }
}

#[test]
fn test_measured_frequency_matches_target() {
    // Sweep a few non-integer spacings across a 9.45 in band
    for lpi in [74.0, 74.6, 75.0, 75.8, 76.0] {
        let tile = render_line_tile(
            SizeIn::new(9.45, 0.5),
            SizePx::new(3402, 180),
            lpi,
            Dpi::uniform(360.0),
        )
        .unwrap();
        let expected = (9.45 * lpi * 3402.0 / (9.45 * 360.0)).round() as isize;
        let counted = count_lines(&tile, 90) as isize;
        assert!(
            (counted - expected).abs() <= 1,
            "lpi {lpi}: counted {counted}, expected about {expected}"
        );
    }
}

#[test]
fn test_tiles_are_deterministic() {
    let render = || {
        render_line_tile(
            SizeIn::new(4.0, 0.4),
            SizePx::new(1440, 144),
            74.7,
            Dpi::uniform(360.0),
        )
        .unwrap()
    };
    let a = render();
    let b = render();
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn test_degenerate_and_invalid_inputs() {
    let dpi = Dpi::uniform(360.0);

    assert!(matches!(
        render_line_tile(SizeIn::new(1.0, 1.0), SizePx::new(360, 360), 0.0, dpi),
        Err(PitchSheetError::Frequency(_))
    ));
    assert!(matches!(
        render_line_tile(SizeIn::new(1.0, 1.0), SizePx::new(0, 360), 75.0, dpi),
        Err(PitchSheetError::Frequency(_))
    ));
    assert!(matches!(
        render_line_tile(SizeIn::new(1.0, 1.0), SizePx::new(360, 0), 75.0, dpi),
        Err(PitchSheetError::Frequency(_))
    ));
    assert!(matches!(
        render_line_tile(SizeIn::new(0.0, 1.0), SizePx::new(360, 360), 75.0, dpi),
        Err(PitchSheetError::Frequency(_))
    ));
}
