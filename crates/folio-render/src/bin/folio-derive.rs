//! Command-line front end for derivative generation.
//!
//! ```text
//! folio-derive --preset gallery --format webp --out images/gallery photos/*.jpg
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use folio_core::logging::targets;
use folio_render::{
    DerivativeOptions, FormatKind, OutputFormat, OutputLayout, WidthPreset, process_batch,
};
use tracing_subscriber::EnvFilter;

/// Generate responsive image derivatives.
#[derive(Parser, Debug)]
#[command(name = "folio-derive", version, about = "Generate responsive image derivatives")]
struct Cli {
    /// Source images.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Width preset: hero, portfolio-card, about, gallery.
    #[arg(short, long, default_value = "gallery")]
    preset: WidthPreset,

    /// Explicit comma-separated widths, overriding the preset.
    #[arg(short, long, value_delimiter = ',')]
    widths: Vec<u32>,

    /// Output format: webp, jpeg, png.
    #[arg(short, long, default_value = "webp")]
    format: FormatKind,

    /// JPEG quality (1-100).
    #[arg(short, long, default_value_t = OutputFormat::DEFAULT_JPEG_QUALITY)]
    quality: u8,

    /// Output directory.
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Write each source's derivatives into its own `<stem>/` folder.
    #[arg(long)]
    per_source_dirs: bool,

    /// Skip sources that already have derivatives.
    #[arg(long)]
    skip_existing: bool,
}

impl Cli {
    fn options(&self) -> DerivativeOptions {
        let format = self.format.with_quality(self.quality);
        let options = if self.widths.is_empty() {
            DerivativeOptions::from_preset(self.preset, format)
        } else {
            DerivativeOptions::new(self.widths.clone(), format)
        };
        let layout = if self.per_source_dirs {
            OutputLayout::PerSource
        } else {
            OutputLayout::Flat
        };
        options
            .with_layout(layout)
            .with_skip_existing(self.skip_existing)
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", targets::RENDER)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let options = cli.options();
    if let Err(error) = options.validate() {
        eprintln!("folio-derive: {error}");
        return ExitCode::from(2);
    }

    let report = process_batch(&cli.inputs, &cli.out, &options);
    println!(
        "{} derivatives written, {} sources skipped, {} failed",
        report.generated.len(),
        report.skipped.len(),
        report.failed.len()
    );
    for (path, error) in &report.failed {
        eprintln!("  {}: {error}", path.display());
    }

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
