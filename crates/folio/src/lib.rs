//! Folio: headless models for an interactive portfolio site.
//!
//! The interactive parts of the site are modelled as single-threaded state
//! machines that a host (a browser binding, a test harness) drives with
//! events:
//!
//! - [`widget::gallery`]: the progressive masonry gallery of client reviews
//! - [`widget::navigation`]: per-page menus, anchor links, active-section
//!   highlighting
//! - [`widget::parallax`]: the hero background parallax
//! - [`widget::popup`]: the survey popup with its focus trap
//! - [`config`]: TOML site configuration
//!
//! # Example
//!
//! ```ignore
//! use folio::prelude::*;
//!
//! let site = SiteConfig::load("folio.toml")?;
//! let mut gallery = GalleryBuilder::new(site.catalog(), host.frames())
//!     .with_config(site.gallery.clone())
//!     .with_surface(host.grid())
//!     .mount_shuffled()
//!     .ok_or("no gallery on this page")?;
//! gallery.start();
//! ```

pub use folio_core::*;

pub mod config;
pub mod prelude;
pub mod widget;
