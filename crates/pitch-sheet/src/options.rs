use crate::types::Margins;
use crate::{PitchSheetError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sheet composition configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SheetOptions {
    /// Number of pitch test bands on the page
    pub segments: usize,

    /// Fraction of each band left blank between consecutive segments.
    /// 0.0 means segments touch; values approach (but never reach) 1.0.
    pub separation: f64,

    /// Page margins in inches
    pub margins: Margins,

    /// Fraction of the drawable (margin-reduced) height reserved for the
    /// header band
    pub header_height_ratio: f64,

    /// Fraction of the drawable width reserved for the LPI label column
    pub label_width_ratio: f64,

    /// Stroke a 2 px outline around each segment as a print alignment aid
    pub segment_outline: bool,

    /// Label font height as a fraction of the label box height
    pub label_font_ratio: f64,

    /// Header title font height as a fraction of the header height
    pub header_font_ratio: f64,

    /// Page info font height as a fraction of the header height
    pub info_font_ratio: f64,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            segments: 11,
            separation: 0.2,
            margins: Margins::default(),
            header_height_ratio: 0.2,
            label_width_ratio: 0.1,
            segment_outline: true,
            label_font_ratio: 0.3,
            header_font_ratio: 0.5,
            info_font_ratio: 0.1,
        }
    }
}

impl SheetOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| PitchSheetError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PitchSheetError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.segments == 0 {
            return Err(PitchSheetError::Config(
                "At least one segment is required".to_string(),
            ));
        }

        if !self.separation.is_finite() || !(0.0..1.0).contains(&self.separation) {
            return Err(PitchSheetError::Config(format!(
                "Separation must be in [0.0, 1.0), got {}",
                self.separation
            )));
        }

        for (name, ratio) in [
            ("Header height ratio", self.header_height_ratio),
            ("Label width ratio", self.label_width_ratio),
        ] {
            if !ratio.is_finite() || !(0.0..1.0).contains(&ratio) {
                return Err(PitchSheetError::Config(format!(
                    "{name} must be in [0.0, 1.0), got {ratio}"
                )));
            }
        }

        for (name, margin) in [
            ("Top", self.margins.top),
            ("Right", self.margins.right),
            ("Bottom", self.margins.bottom),
            ("Left", self.margins.left),
        ] {
            if !margin.is_finite() || margin < 0.0 {
                return Err(PitchSheetError::Config(format!(
                    "{name} margin must be non-negative, got {margin}"
                )));
            }
        }

        for (name, ratio) in [
            ("Label font ratio", self.label_font_ratio),
            ("Header font ratio", self.header_font_ratio),
            ("Info font ratio", self.info_font_ratio),
        ] {
            if !ratio.is_finite() || !(ratio > 0.0 && ratio <= 1.0) {
                return Err(PitchSheetError::Config(format!(
                    "{name} must be in (0.0, 1.0], got {ratio}"
                )));
            }
        }

        Ok(())
    }
}
