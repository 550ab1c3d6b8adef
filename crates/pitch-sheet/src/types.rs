use crate::{PitchSheetError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unit system for page dimension input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PageUnit {
    #[default]
    Inches,
    Centimeters,
}

impl PageUnit {
    /// Conversion factor from this unit to inches
    pub fn to_inches(self) -> f64 {
        match self {
            PageUnit::Inches => 1.0,
            PageUnit::Centimeters => 1.0 / 2.54,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PageUnit::Inches => "in",
            PageUnit::Centimeters => "cm",
        }
    }
}

/// Printer resolution in dots per inch, per axis.
/// Kept as a pair because many printers have a non-square maximum resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dpi {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Dpi {
    pub fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Same resolution on both axes
    pub fn uniform(dpi: f64) -> Self {
        Self {
            horizontal: dpi,
            vertical: dpi,
        }
    }
}

/// A size in physical inches
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SizeIn {
    pub width: f64,
    pub height: f64,
}

impl SizeIn {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Convert to pixels at the given resolution, rounding each axis to the
    /// nearest pixel (never truncating)
    pub fn to_px(self, dpi: Dpi) -> SizePx {
        SizePx {
            width: (self.width * dpi.horizontal).round() as u32,
            height: (self.height * dpi.vertical).round() as u32,
        }
    }
}

/// A size in whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle in inches; position is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RectIn {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectIn {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn size(&self) -> SizeIn {
        SizeIn::new(self.width, self.height)
    }

    /// Convert to a pixel rectangle at the given resolution.
    ///
    /// Position and size round independently, so adjacent rectangles may
    /// disagree by one pixel along a shared edge; that seam is accepted
    /// rather than corrected by snapping to neighbors.
    pub fn to_px(&self, dpi: Dpi) -> RectPx {
        RectPx {
            x: (self.x * dpi.horizontal).round() as u32,
            y: (self.y * dpi.vertical).round() as u32,
            width: (self.width * dpi.horizontal).round() as u32,
            height: (self.height * dpi.vertical).round() as u32,
        }
    }
}

/// An axis-aligned rectangle in whole pixels; position is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RectPx {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RectPx {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn size(&self) -> SizePx {
        SizePx::new(self.width, self.height)
    }
}

/// Page margins in inches
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(0.25)
    }
}

impl Margins {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create uniform margins on all sides
    pub fn uniform(margin: f64) -> Self {
        Self {
            top: margin,
            right: margin,
            bottom: margin,
            left: margin,
        }
    }

    /// Combined left + right margin
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Combined top + bottom margin
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Immutable description of the physical page and the target printer.
///
/// Constructed once per sheet request; the pitch bounds are the LPI range
/// swept across the test segments.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageSpec {
    low_pitch: f64,
    high_pitch: f64,
    size_in: SizeIn,
    dpi: Dpi,
    unit: PageUnit,
}

impl PageSpec {
    /// Validate and build a page spec. `dimensions` is interpreted in `unit`
    /// and stored internally in inches.
    pub fn new(
        low_pitch: f64,
        high_pitch: f64,
        dimensions: SizeIn,
        unit: PageUnit,
        dpi: Dpi,
    ) -> Result<Self> {
        for (name, value) in [
            ("low_pitch", low_pitch),
            ("high_pitch", high_pitch),
            ("page width", dimensions.width),
            ("page height", dimensions.height),
            ("horizontal dpi", dpi.horizontal),
            ("vertical dpi", dpi.vertical),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PitchSheetError::Config(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        if low_pitch > high_pitch {
            return Err(PitchSheetError::Config(format!(
                "low_pitch ({low_pitch}) must not exceed high_pitch ({high_pitch})"
            )));
        }

        let conv = unit.to_inches();
        Ok(Self {
            low_pitch,
            high_pitch,
            size_in: SizeIn::new(dimensions.width * conv, dimensions.height * conv),
            dpi,
            unit,
        })
    }

    pub fn low_pitch(&self) -> f64 {
        self.low_pitch
    }

    pub fn high_pitch(&self) -> f64 {
        self.high_pitch
    }

    /// Page dimensions in inches
    pub fn size_in(&self) -> SizeIn {
        self.size_in
    }

    pub fn dpi(&self) -> Dpi {
        self.dpi
    }

    /// Unit the page dimensions were supplied in
    pub fn unit(&self) -> PageUnit {
        self.unit
    }

    /// Full page raster resolution
    pub fn size_px(&self) -> SizePx {
        self.size_in.to_px(self.dpi)
    }

    /// Page dimensions converted back to the unit they were supplied in,
    /// for display
    pub fn display_dimensions(&self) -> SizeIn {
        match self.unit {
            PageUnit::Inches => self.size_in,
            PageUnit::Centimeters => SizeIn::new(self.size_in.width * 2.54, self.size_in.height * 2.54),
        }
    }
}
