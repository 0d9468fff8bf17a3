//! Image derivative generation for Folio sites.
//!
//! Pages serve each photo at several widths through `srcset`. This crate
//! produces those files from the originals:
//!
//! ```ignore
//! use folio_render::{DerivativeOptions, OutputFormat, WidthPreset, process_batch};
//!
//! let options = DerivativeOptions::from_preset(WidthPreset::Gallery, OutputFormat::WebP)
//!     .with_skip_existing(true);
//! let report = process_batch(&["gallery/deck.jpg"], "gallery/out".as_ref(), &options);
//! assert!(report.is_success());
//! ```
//!
//! The `folio-derive` binary wraps [`process_batch`] for the command line.

pub mod derivatives;
mod error;
pub mod image_buffer;

pub use derivatives::{
    BatchReport, Derivative, DerivativeOptions, Outcome, OutputLayout, WidthPreset, derivative_path,
    generate_derivatives, process_batch,
};
pub use error::{ParseNameError, RenderError, RenderResult};
pub use image_buffer::{FormatKind, ImageBuffer, OutputFormat, ResizeFilter};
