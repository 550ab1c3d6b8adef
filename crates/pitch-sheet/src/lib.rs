pub mod layout;
mod options;
mod raster;
mod sheet;
mod text;
mod types;

pub use layout::{LayoutPlan, SegmentPlacement, interpolate_lpi, plan_layout};
pub use options::*;
pub use raster::{LineTile, render_line_tile};
pub use sheet::{compose_pitch_sheet, generate_pitch_sheet, save_canvas};
pub use text::*;
pub use types::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PitchSheetError {
    #[error("Invalid layout configuration: {0}")]
    Config(String),
    #[error("Invalid line frequency: {0}")]
    Frequency(String),
    #[error("Text collaborator unavailable: {0}")]
    Resource(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, PitchSheetError>;
