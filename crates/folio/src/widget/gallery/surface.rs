//! Collaborator interfaces the gallery drives.
//!
//! The gallery never touches a document directly. A host implements these
//! traits over whatever actually renders the page and forwards the
//! corresponding events back into [`MasonryGallery`](super::MasonryGallery).

use super::item::{ImageReadiness, ItemId, ItemSpec};
use super::measure::RawGridMetrics;

/// The container that receives gallery cells.
pub trait GallerySurface {
    /// Create and append a cell for `spec`, starting a lazy image load.
    ///
    /// Returns whether the image is already complete.
    fn append_item(&mut self, spec: &ItemSpec<'_>) -> ImageReadiness;

    /// Publish the busy flag (`aria-busy`).
    fn set_busy(&mut self, busy: bool);

    /// Publish the initializing flag. The gallery only ever clears it.
    fn set_initializing(&mut self, initializing: bool);

    /// Mark a cell as revealed.
    fn reveal(&mut self, item: ItemId);

    /// Read the container's grid row height and row gap.
    fn grid_metrics(&self) -> RawGridMetrics;

    /// Rendered height of a cell's content, if it has any layout yet.
    fn content_height(&self, item: ItemId) -> Option<f32>;

    /// Apply a row span to a cell.
    fn set_row_span(&mut self, item: ItemId, span: u32);
}

/// Published state of the load-more control.
///
/// `hidden` is mirrored to both the `hidden` and `aria-hidden` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerState {
    pub enabled: bool,
    pub hidden: bool,
}

impl TriggerState {
    /// State for a gallery that does or does not have entries left.
    pub fn for_remaining(has_more: bool) -> Self {
        Self {
            enabled: has_more,
            hidden: !has_more,
        }
    }
}

/// The "load more" control.
pub trait LoadMoreTrigger {
    fn set_state(&mut self, state: TriggerState);
}

/// Reports when cells cross a visibility threshold.
pub trait IntersectionNotifier {
    /// Start watching `item`; the host reports ratios through
    /// [`MasonryGallery::on_intersection`](super::MasonryGallery::on_intersection).
    fn observe(&mut self, item: ItemId, threshold: f32);

    fn unobserve(&mut self, item: ItemId);
}

/// Reports when a cell's rendered box size changes.
pub trait SizeChangeNotifier {
    fn observe(&mut self, item: ItemId);

    fn unobserve(&mut self, item: ItemId);
}
