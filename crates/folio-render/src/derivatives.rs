//! Responsive image derivatives.
//!
//! Each source image is flattened to RGB and resized to a set of widths,
//! keeping its aspect ratio. Outputs are named `<stem>-<width>.<ext>` so a
//! page can list them in a `srcset`. They go either straight into the output
//! directory or into a `<stem>/` folder per source ([`OutputLayout`]).

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use folio_core::PerfSpan;
use folio_core::logging::span_names;

use crate::error::{ParseNameError, RenderError, RenderResult};
use crate::image_buffer::{ImageBuffer, OutputFormat, ResizeFilter};

/// Width sets for the places images appear on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WidthPreset {
    /// Full-bleed hero backgrounds.
    Hero,
    /// Portfolio cards on the home page.
    PortfolioCard,
    /// Portraits on the about page.
    About,
    /// Masonry gallery tiles.
    #[default]
    Gallery,
}

impl WidthPreset {
    pub const ALL: [WidthPreset; 4] = [
        WidthPreset::Hero,
        WidthPreset::PortfolioCard,
        WidthPreset::About,
        WidthPreset::Gallery,
    ];

    /// Target widths in pixels, ascending.
    pub fn widths(self) -> &'static [u32] {
        match self {
            WidthPreset::Hero => &[320, 640, 960, 1280, 1600, 1920],
            WidthPreset::PortfolioCard => &[320, 480, 640, 768],
            WidthPreset::About => &[480, 768, 1024],
            WidthPreset::Gallery => &[320, 480, 640, 768, 1024, 1280, 1536, 1920],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WidthPreset::Hero => "hero",
            WidthPreset::PortfolioCard => "portfolio-card",
            WidthPreset::About => "about",
            WidthPreset::Gallery => "gallery",
        }
    }
}

impl fmt::Display for WidthPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WidthPreset {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WidthPreset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseNameError {
                kind: "preset",
                name: s.to_owned(),
                expected: "hero, portfolio-card, about, gallery",
            })
    }
}

/// Where derivatives land relative to the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputLayout {
    /// `<out>/<stem>-<width>.<ext>`
    #[default]
    Flat,
    /// `<out>/<stem>/<stem>-<width>.<ext>`
    PerSource,
}

impl OutputLayout {
    /// Directory receiving the derivatives of `stem`.
    pub fn dir_for(self, out_dir: &Path, stem: &str) -> PathBuf {
        match self {
            OutputLayout::Flat => out_dir.to_path_buf(),
            OutputLayout::PerSource => out_dir.join(stem),
        }
    }
}

/// What to generate for each source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivativeOptions {
    pub widths: Vec<u32>,
    pub format: OutputFormat,
    pub filter: ResizeFilter,
    pub layout: OutputLayout,
    /// Skip sources whose marker derivative already exists.
    pub skip_existing: bool,
}

impl DerivativeOptions {
    pub fn new(widths: impl Into<Vec<u32>>, format: OutputFormat) -> Self {
        Self {
            widths: widths.into(),
            format,
            filter: ResizeFilter::default(),
            layout: OutputLayout::default(),
            skip_existing: false,
        }
    }

    pub fn from_preset(preset: WidthPreset, format: OutputFormat) -> Self {
        Self::new(preset.widths(), format)
    }

    #[must_use]
    pub fn with_skip_existing(mut self, skip: bool) -> Self {
        self.skip_existing = skip;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn validate(&self) -> RenderResult<()> {
        if self.widths.is_empty() || self.widths.contains(&0) {
            return Err(RenderError::InvalidWidths(self.widths.clone()));
        }
        self.format.validate()
    }

    /// The width whose output marks a source as already processed: 1024 when
    /// requested, otherwise the largest width.
    pub fn marker_width(&self) -> Option<u32> {
        if self.widths.contains(&1024) {
            Some(1024)
        } else {
            self.widths.iter().copied().max()
        }
    }
}

/// One written derivative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivative {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Result of processing one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Generated(Vec<Derivative>),
    /// The marker derivative already existed.
    Skipped,
}

/// Output path for `stem` at `width`.
pub fn derivative_path(out_dir: &Path, stem: &str, width: u32, format: OutputFormat) -> PathBuf {
    out_dir.join(format!("{stem}-{width}.{}", format.extension()))
}

fn source_stem(source: &Path) -> RenderResult<String> {
    source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| RenderError::MissingStem(source.to_path_buf()))
}

/// Generate every derivative of `source` under `out_dir`.
///
/// The target directory is created if missing. Widths larger than the source
/// are upscaled. Two sources sharing a file stem write to the same paths; use
/// [`process_batch`] to have such clashes reported.
pub fn generate_derivatives(
    source: &Path,
    out_dir: &Path,
    options: &DerivativeOptions,
) -> RenderResult<Outcome> {
    options.validate()?;
    let stem = source_stem(source)?;
    let out_dir = &options.layout.dir_for(out_dir, &stem);

    if options.skip_existing {
        if let Some(marker) = options.marker_width() {
            if derivative_path(out_dir, &stem, marker, options.format).exists() {
                tracing::debug!(
                    target: "folio_render",
                    source = %source.display(),
                    "derivatives exist, skipping"
                );
                return Ok(Outcome::Skipped);
            }
        }
    }

    let _span = PerfSpan::new(span_names::DERIVATIVES);
    std::fs::create_dir_all(out_dir).map_err(|source| RenderError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let image = ImageBuffer::from_file(source)?.to_rgb();
    let mut written = Vec::with_capacity(options.widths.len());
    for &width in &options.widths {
        let resized = image.resize_to_width(width, options.filter)?;
        let path = derivative_path(out_dir, &stem, width, options.format);
        resized.save_with_format(&path, options.format)?;
        tracing::trace!(
            target: "folio_render",
            path = %path.display(),
            width,
            height = resized.height(),
            "wrote derivative"
        );
        written.push(Derivative {
            path,
            width,
            height: resized.height(),
        });
    }

    tracing::info!(
        target: "folio_render",
        source = %source.display(),
        count = written.len(),
        format = %options.format,
        "generated derivatives"
    );
    Ok(Outcome::Generated(written))
}

/// Summary of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub generated: Vec<Derivative>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, RenderError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Process every source, continuing past failures.
///
/// The first source to produce output under a file stem claims it; later
/// sources with the same stem fail with [`RenderError::DuplicateStem`]
/// instead of overwriting its derivatives.
pub fn process_batch<P: AsRef<Path>>(
    sources: &[P],
    out_dir: &Path,
    options: &DerivativeOptions,
) -> BatchReport {
    let mut report = BatchReport::default();
    let mut claimed: HashMap<String, PathBuf> = HashMap::new();
    for source in sources {
        let source = source.as_ref();
        let stem = source_stem(source).ok();
        let result = match stem.as_ref().and_then(|stem| claimed.get(stem)) {
            Some(first) => Err(RenderError::DuplicateStem {
                path: source.to_path_buf(),
                first: first.clone(),
            }),
            None => generate_derivatives(source, out_dir, options),
        };

        match result {
            Ok(outcome) => {
                if let Some(stem) = stem {
                    claimed.insert(stem, source.to_path_buf());
                }
                match outcome {
                    Outcome::Generated(mut derivatives) => {
                        report.generated.append(&mut derivatives)
                    }
                    Outcome::Skipped => report.skipped.push(source.to_path_buf()),
                }
            }
            Err(error) => {
                tracing::warn!(
                    target: "folio_render",
                    source = %source.display(),
                    %error,
                    "failed to generate derivatives"
                );
                report.failed.push((source.to_path_buf(), error));
            }
        }
    }
    report
}
