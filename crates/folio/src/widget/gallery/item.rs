//! Per-item state for the masonry gallery.

use std::time::Duration;

use slotmap::new_key_type;

new_key_type! {
    /// Identifies one cell of a [`MasonryGallery`](super::MasonryGallery).
    ///
    /// Hosts map these to their own nodes when [`GallerySurface::append_item`]
    /// is called and echo them back with every event.
    ///
    /// [`GallerySurface::append_item`]: super::GallerySurface::append_item
    pub struct ItemId;
}

/// Reveal progress of a gallery item.
///
/// Items move forward only: `Unobserved → Observing → Visible`, or straight to
/// `Visible` when reveal animation is not in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealState {
    /// Created but not yet registered with the intersection notifier.
    #[default]
    Unobserved,
    /// Waiting for the item to scroll into view.
    Observing,
    /// Shown. Terminal.
    Visible,
}

impl RevealState {
    /// Whether the item has been revealed.
    pub fn is_visible(self) -> bool {
        self == RevealState::Visible
    }
}

/// Image load progress of a gallery item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// The image request has neither succeeded nor failed.
    #[default]
    Pending,
    /// The image decoded and can be measured.
    Loaded,
    /// The image failed. Terminal; never retried.
    Failed,
}

impl LoadState {
    /// Whether the load has finished, successfully or not.
    pub fn is_settled(self) -> bool {
        self != LoadState::Pending
    }
}

/// One gallery cell wrapping a single image reference.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryItem {
    source: String,
    position: usize,
    reveal: RevealState,
    load: LoadState,
    row_span: u32,
}

impl GalleryItem {
    pub(crate) fn new(source: impl Into<String>, position: usize) -> Self {
        Self {
            source: source.into(),
            position,
            reveal: RevealState::Unobserved,
            load: LoadState::Pending,
            row_span: 1,
        }
    }

    /// The image reference this item displays.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Offset of this item in the presentation order.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn reveal(&self) -> RevealState {
        self.reveal
    }

    pub fn load(&self) -> LoadState {
        self.load
    }

    /// Number of grid rows the item spans. Starts at 1.
    pub fn row_span(&self) -> u32 {
        self.row_span
    }

    pub(crate) fn set_reveal(&mut self, reveal: RevealState) {
        self.reveal = reveal;
    }

    pub(crate) fn set_load(&mut self, load: LoadState) {
        self.load = load;
    }

    pub(crate) fn set_row_span(&mut self, span: u32) {
        self.row_span = span.max(1);
    }
}

/// Describes a newly created item to the container surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemSpec<'a> {
    /// Handle the surface should associate with the created node.
    pub id: ItemId,
    /// Image reference to load, lazily.
    pub source: &'a str,
    /// Offset in the presentation order.
    pub position: usize,
    /// Reveal transition delay; `None` when reduced motion is active.
    pub reveal_delay: Option<Duration>,
}

/// State of an item's image as reported by the surface at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageReadiness {
    /// Still loading; a load or failure event will follow.
    Pending,
    /// Already complete with decoded content (served from cache).
    Loaded,
    /// Already complete without content (a cached broken image).
    Broken,
}

/// Reveal transition delay for the item at `position`.
///
/// Delays cycle every `cycle` items in `step` increments, capped at `cap`.
pub fn stagger_delay(position: usize, step: Duration, cycle: usize, cap: Duration) -> Duration {
    let slot = if cycle == 0 { 0 } else { position % cycle };
    let slot = u32::try_from(slot).unwrap_or(u32::MAX);
    step.saturating_mul(slot).min(cap)
}
