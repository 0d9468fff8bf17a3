//! Prelude module for Folio.
//!
//! ```ignore
//! use folio::prelude::*;
//! ```

// ============================================================================
// Core
// ============================================================================

pub use folio_core::{Debouncer, FrameRequest, FrameScheduler, Signal, Throttle};

// ============================================================================
// Configuration
// ============================================================================

pub use crate::config::{ConfigError, ConfigResult, GalleryConfig, SiteConfig};

// ============================================================================
// Widgets
// ============================================================================

pub use crate::widget::DefaultAction;
pub use crate::widget::gallery::{
    GalleryBuilder, GalleryEvent, GallerySurface, ImageReadiness, IntersectionNotifier, ItemId,
    LoadMoreTrigger, MasonryGallery, SizeChangeNotifier, SourceCatalog, TriggerState,
};
pub use crate::widget::navigation::{MenuSurface, NavigationMenu, SectionGeometry};
pub use crate::widget::parallax::{HeroSurface, ParallaxHero};
pub use crate::widget::popup::{PopupSurface, SurveyPopup};
