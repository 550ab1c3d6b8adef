use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pitch_sheet::{
    Dpi, Margins, PageSpec, PageUnit, SheetOptions, SizeIn, TrueTypeTextRenderer,
    generate_pitch_sheet,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lentools", about = "Lenticular printing tools", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a printable pitch calibration sheet
    PitchSheet {
        /// Lower pitch bound in lines per inch
        #[arg(long, default_value = "74.0")]
        low_pitch: f64,

        /// Upper pitch bound in lines per inch
        #[arg(long, default_value = "76.0")]
        high_pitch: f64,

        /// Page width (inches, or centimeters with --metric)
        #[arg(long, default_value = "11.0")]
        width: f64,

        /// Page height (inches, or centimeters with --metric)
        #[arg(long, default_value = "8.5")]
        height: f64,

        /// Interpret page dimensions as centimeters
        #[arg(long)]
        metric: bool,

        /// Horizontal printer resolution in dots per inch
        #[arg(long, default_value = "360.0")]
        dpi_horizontal: f64,

        /// Vertical printer resolution in dots per inch
        #[arg(long, default_value = "360.0")]
        dpi_vertical: f64,

        /// Number of pitch test bands
        #[arg(long, default_value = "11")]
        segments: usize,

        /// Blank fraction of each band, 0.0 inclusive to 1.0 exclusive
        #[arg(long, default_value = "0.2")]
        separation: f64,

        /// Margins in inches: top right bottom left
        #[arg(long, num_args = 4, default_values = ["0.25", "0.25", "0.25", "0.25"])]
        margins: Vec<f64>,

        /// Fraction of the drawable height reserved for the header
        #[arg(long, default_value = "0.2")]
        header_ratio: f64,

        /// Fraction of the drawable width reserved for the label column
        #[arg(long, default_value = "0.1")]
        label_ratio: f64,

        /// Skip the 2 px alignment outline around each segment
        #[arg(long)]
        no_outline: bool,

        /// TrueType font for the header and labels; without it, text is skipped
        #[arg(long)]
        font: Option<PathBuf>,

        /// Output image path (format chosen from the extension)
        #[arg(short, long, default_value = "pitch_sheet.png")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::PitchSheet {
            low_pitch,
            high_pitch,
            width,
            height,
            metric,
            dpi_horizontal,
            dpi_vertical,
            segments,
            separation,
            margins,
            header_ratio,
            label_ratio,
            no_outline,
            font,
            output,
        } => {
            let unit = if metric {
                PageUnit::Centimeters
            } else {
                PageUnit::Inches
            };
            let page = PageSpec::new(
                low_pitch,
                high_pitch,
                SizeIn::new(width, height),
                unit,
                Dpi::new(dpi_horizontal, dpi_vertical),
            )?;

            let options = SheetOptions {
                segments,
                separation,
                margins: Margins::new(margins[0], margins[1], margins[2], margins[3]),
                header_height_ratio: header_ratio,
                label_width_ratio: label_ratio,
                segment_outline: !no_outline,
                ..SheetOptions::default()
            };

            let renderer = match font {
                Some(path) => {
                    let bytes = tokio::fs::read(&path)
                        .await
                        .with_context(|| format!("Failed to read font {}", path.display()))?;
                    Some(TrueTypeTextRenderer::from_bytes(bytes)?)
                }
                None => None,
            };

            generate_pitch_sheet(&page, &options, renderer, &output).await?;
            println!("Wrote {}", output.display());
        }
    }

    Ok(())
}
