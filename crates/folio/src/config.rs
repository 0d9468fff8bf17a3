//! Site configuration loaded from TOML.
//!
//! ```toml
//! [gallery]
//! initial_batch_size = 24
//! repeat_batch_size = 12
//! reveal_threshold = 0.15
//!
//! [catalog]
//! sources = [
//!     "assets/reviews/review-01.png",
//!     "assets/reviews/review-02.png",
//! ]
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::widget::gallery::SourceCatalog;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid TOML or does not match the schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tuning for the masonry gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Items appended by the first batch.
    pub initial_batch_size: usize,
    /// Items appended per load-more activation.
    pub repeat_batch_size: usize,
    /// Visible fraction at which an item is revealed, in `(0, 1]`.
    pub reveal_threshold: f32,
    /// Quiet period after a viewport resize before remeasuring everything.
    pub resize_settle_ms: u64,
    /// Row height used when the container reports an unusable one.
    pub fallback_row_height: f32,
    /// Row gap used when the container reports an unusable one.
    pub fallback_row_gap: f32,
    pub stagger_step_ms: u64,
    pub stagger_cap_ms: u64,
    /// Positions per stagger cycle. Zero disables staggering.
    pub stagger_cycle: usize,
}

impl GalleryConfig {
    pub const DEFAULT_INITIAL_BATCH_SIZE: usize = 24;
    pub const DEFAULT_REPEAT_BATCH_SIZE: usize = 12;
    pub const DEFAULT_REVEAL_THRESHOLD: f32 = 0.15;
    pub const DEFAULT_RESIZE_SETTLE_MS: u64 = 180;
    pub const DEFAULT_FALLBACK_ROW_HEIGHT: f32 = 16.0;
    pub const DEFAULT_FALLBACK_ROW_GAP: f32 = 16.0;

    pub fn resize_settle(&self) -> Duration {
        Duration::from_millis(self.resize_settle_ms)
    }

    pub fn stagger_step(&self) -> Duration {
        Duration::from_millis(self.stagger_step_ms)
    }

    pub fn stagger_cap(&self) -> Duration {
        Duration::from_millis(self.stagger_cap_ms)
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.initial_batch_size == 0 {
            return Err(invalid("gallery.initial_batch_size", "must be at least 1"));
        }
        if self.repeat_batch_size == 0 {
            return Err(invalid("gallery.repeat_batch_size", "must be at least 1"));
        }
        let threshold = self.reveal_threshold;
        if !(threshold.is_finite() && threshold > 0.0 && threshold <= 1.0) {
            return Err(invalid(
                "gallery.reveal_threshold",
                format!("{threshold} is outside (0, 1]"),
            ));
        }
        let height = self.fallback_row_height;
        if !(height.is_finite() && height > 0.0) {
            return Err(invalid(
                "gallery.fallback_row_height",
                format!("{height} is not a positive length"),
            ));
        }
        let gap = self.fallback_row_gap;
        if !(gap.is_finite() && gap >= 0.0) {
            return Err(invalid(
                "gallery.fallback_row_gap",
                format!("{gap} is not a non-negative length"),
            ));
        }
        Ok(())
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            initial_batch_size: Self::DEFAULT_INITIAL_BATCH_SIZE,
            repeat_batch_size: Self::DEFAULT_REPEAT_BATCH_SIZE,
            reveal_threshold: Self::DEFAULT_REVEAL_THRESHOLD,
            resize_settle_ms: Self::DEFAULT_RESIZE_SETTLE_MS,
            fallback_row_height: Self::DEFAULT_FALLBACK_ROW_HEIGHT,
            fallback_row_gap: Self::DEFAULT_FALLBACK_ROW_GAP,
            stagger_step_ms: 45,
            stagger_cap_ms: 320,
            stagger_cycle: 12,
        }
    }
}

/// The image references the gallery draws from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogManifest {
    pub sources: Vec<String>,
}

/// Top-level site configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub gallery: GalleryConfig,
    pub catalog: CatalogManifest,
}

impl SiteConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let config: SiteConfig = toml::from_str(s)?;
        config.gallery.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            target: "folio::config",
            path = %path.display(),
            sources = config.catalog.sources.len(),
            "site configuration loaded"
        );
        Ok(config)
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// The gallery catalog described by the manifest.
    pub fn catalog(&self) -> SourceCatalog {
        SourceCatalog::new(self.catalog.sources.iter().cloned())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
