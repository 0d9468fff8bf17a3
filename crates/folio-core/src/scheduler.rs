//! Frame-timed scheduling.
//!
//! Layout writes are batched into the next animation frame. A component asks
//! its host for a frame through [`FrameScheduler`] and tracks the outstanding
//! request with a [`FrameRequest`], which makes requesting idempotent: while a
//! frame is pending, further requests join it instead of scheduling another.
//!
//! ```
//! use folio_core::{FrameRequest, FrameScheduler};
//!
//! let mut requested = 0;
//! let mut host = || requested += 1;
//! let mut frame = FrameRequest::new();
//!
//! assert!(frame.schedule(&mut host));
//! assert!(!frame.schedule(&mut host));
//! assert!(frame.complete());
//! drop(host);
//! assert_eq!(requested, 1);
//! ```

/// A host capability that runs a callback before the next paint.
///
/// Implementations only record the request; the host later calls back into
/// the component that asked (for example `MasonryGallery::on_animation_frame`).
pub trait FrameScheduler {
    /// Ask for one callback before the next paint.
    fn request_frame(&mut self);
}

impl<F: FnMut()> FrameScheduler for F {
    fn request_frame(&mut self) {
        self()
    }
}

/// Tracks whether a frame has been requested and not yet delivered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest {
    pending: bool,
}

impl FrameRequest {
    /// Create an idle request tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a frame unless one is already outstanding.
    ///
    /// Returns `true` if a new request was handed to the scheduler.
    pub fn schedule(&mut self, scheduler: &mut dyn FrameScheduler) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        scheduler.request_frame();
        tracing::trace!(target: "folio_core::scheduler", "frame requested");
        true
    }

    /// Whether a frame is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Mark the outstanding frame as delivered.
    ///
    /// Returns `true` if a frame was pending.
    pub fn complete(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}
