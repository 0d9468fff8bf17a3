//! Deferred row-span measurement.
//!
//! Items that need their row span recomputed are collected in a
//! [`MeasurementQueue`]. The first item queued while no flush is outstanding
//! requests one animation frame; everything queued before that frame arrives
//! joins the same flush. A flush reads [`GridMetrics`] once and applies one
//! span per queued item.

use std::collections::HashSet;

use folio_core::{FrameRequest, FrameScheduler};

use super::item::ItemId;

/// Grid row metrics as read from the container.
///
/// Either value may be missing or garbage when styles have not been applied;
/// [`GridMetrics::resolve`] fills in fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawGridMetrics {
    /// Height of one implicit grid row, in pixels.
    pub row_height: Option<f32>,
    /// Gap between grid rows, in pixels.
    pub row_gap: Option<f32>,
}

/// Usable grid row metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    row_height: f32,
    row_gap: f32,
}

impl GridMetrics {
    /// Resolve raw metrics, substituting fallbacks for unusable values.
    ///
    /// A row height must be finite and positive. A row gap must be finite and
    /// non-negative; a gap of exactly zero is kept.
    pub fn resolve(raw: RawGridMetrics, fallback_row_height: f32, fallback_row_gap: f32) -> Self {
        let row_height = raw
            .row_height
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or(fallback_row_height);
        let row_gap = raw
            .row_gap
            .filter(|g| g.is_finite() && *g >= 0.0)
            .unwrap_or(fallback_row_gap);
        Self {
            row_height,
            row_gap,
        }
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn row_gap(&self) -> f32 {
        self.row_gap
    }

    /// Rows needed for content of the given height, at least one.
    pub fn row_span(&self, content_height: f32) -> u32 {
        let pitch = self.row_height + self.row_gap;
        if !(pitch.is_finite() && pitch > 0.0) {
            return 1;
        }
        let rows = ((content_height + self.row_gap) / pitch).ceil();
        if rows.is_finite() && rows >= 1.0 {
            // Saturating float-to-int cast.
            rows as u32
        } else {
            1
        }
    }
}

/// Items awaiting measurement plus the outstanding-frame flag.
///
/// Queue order is first-enqueue order; re-enqueueing an item that is already
/// waiting is a no-op.
#[derive(Debug, Default)]
pub struct MeasurementQueue {
    order: Vec<ItemId>,
    members: HashSet<ItemId>,
    frame: FrameRequest,
}

impl MeasurementQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `item` and make sure a flush frame is requested.
    ///
    /// Returns `true` if the item was not already waiting.
    pub fn enqueue(&mut self, item: ItemId, scheduler: &mut dyn FrameScheduler) -> bool {
        let added = self.members.insert(item);
        if added {
            self.order.push(item);
        }
        self.frame.schedule(scheduler);
        added
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.members.contains(&item)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether a flush frame has been requested and not yet delivered.
    pub fn is_scheduled(&self) -> bool {
        self.frame.is_pending()
    }

    /// Take everything queued for this frame and reset the frame flag.
    pub fn take_batch(&mut self) -> Vec<ItemId> {
        self.frame.complete();
        self.members.clear();
        std::mem::take(&mut self.order)
    }
}
