//! Logging facilities for Folio.
//!
//! Folio uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the host installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("folio::gallery=debug")
//!     .init();
//! ```
//!
//! Every subsystem logs under its own target so it can be filtered
//! independently; the constants in [`targets`] list them.

/// Span names used throughout Folio for tracing.
pub mod span_names {
    /// Measurement flush span.
    pub const MEASURE_FLUSH: &str = "folio::measure_flush";
    /// Batch append span.
    pub const APPEND_BATCH: &str = "folio::append_batch";
    /// Derivative generation span.
    pub const DERIVATIVES: &str = "folio::derivatives";
}

/// Target names for log filtering.
///
/// Call sites spell the target out as a literal; these constants name the
/// same strings for building subscriber filter directives, e.g.
/// `EnvFilter::new(format!("{}=debug", targets::GALLERY))`.
pub mod targets {
    /// Core runtime target.
    pub const CORE: &str = "folio_core";
    /// Timer system target.
    pub const TIMER: &str = "folio_core::timer";
    /// Signal system target.
    pub const SIGNAL: &str = "folio_core::signal";
    /// Frame scheduling target.
    pub const SCHEDULER: &str = "folio_core::scheduler";
    /// Masonry gallery target.
    pub const GALLERY: &str = "folio::gallery";
    /// Navigation menu and anchors target.
    pub const NAVIGATION: &str = "folio::navigation";
    /// Parallax hero target.
    pub const PARALLAX: &str = "folio::parallax";
    /// Survey popup target.
    pub const POPUP: &str = "folio::popup";
    /// Configuration loading target.
    pub const CONFIG: &str = "folio::config";
    /// Image derivative generation target.
    pub const RENDER: &str = "folio_render";
    /// [`PerfSpan`](super::PerfSpan) target.
    pub const PERF: &str = "folio::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for timing a block of work in a profiler-aware subscriber.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "folio::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[macro_export]
macro_rules! folio_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "folio_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! folio_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "folio_core", $($arg)*)
    };
}
