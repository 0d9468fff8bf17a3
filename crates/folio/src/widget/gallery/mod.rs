//! Progressive masonry gallery.
//!
//! [`MasonryGallery`] shows a shuffled catalog of images in a CSS-grid style
//! masonry layout, a page at a time. It is a headless state machine: the host
//! supplies the collaborators ([`GallerySurface`], [`LoadMoreTrigger`],
//! [`IntersectionNotifier`], [`SizeChangeNotifier`] and a
//! [`FrameScheduler`]) and forwards their events back in. Nothing the host
//! reports can make the gallery fail; bad input degrades to "show it anyway".
//!
//! # Lifecycle
//!
//! 1. [`GalleryBuilder::mount`] shuffles the catalog once. It returns `None`
//!    when there is no container surface to render into.
//! 2. [`MasonryGallery::start`] appends the initial page (or settles into the
//!    empty state).
//! 3. Image load/failure, intersection, size-change, resize and animation
//!    frame events drive each item through
//!    `Unobserved → Observing → Visible` and `Pending → Loaded | Failed`.
//! 4. [`MasonryGallery::activate_load_more`] appends the next page.
//!
//! # Example
//!
//! ```ignore
//! use folio::widget::gallery::{GalleryBuilder, SourceCatalog};
//!
//! let catalog = SourceCatalog::new(["assets/reviews/1.png", "assets/reviews/2.png"]);
//! let mut gallery = GalleryBuilder::new(catalog, host.frame_scheduler())
//!     .with_surface(host.grid())
//!     .with_trigger(host.load_more_button())
//!     .with_intersection_notifier(host.intersections())
//!     .with_size_change_notifier(host.resize_observer())
//!     .with_reduced_motion(host.prefers_reduced_motion())
//!     .mount(&mut rand::thread_rng())
//!     .expect("page has a gallery container");
//!
//! gallery.start();
//! gallery.exhausted().connect(|total| println!("all {total} reviews shown"));
//! ```

mod catalog;
mod item;
mod measure;
mod surface;

pub use catalog::{PresentationOrder, SourceCatalog};
pub use item::{
    GalleryItem, ImageReadiness, ItemId, ItemSpec, LoadState, RevealState, stagger_delay,
};
pub use measure::{GridMetrics, MeasurementQueue, RawGridMetrics};
pub use surface::{
    GallerySurface, IntersectionNotifier, LoadMoreTrigger, SizeChangeNotifier, TriggerState,
};

use std::time::{Duration, Instant};

use folio_core::logging::span_names;
use folio_core::{Debouncer, FrameScheduler, PerfSpan, Signal};
use rand::Rng;
use slotmap::SlotMap;

use catalog::Pagination;

use crate::config::GalleryConfig;
use crate::widget::DefaultAction;

/// An event a host forwards to the gallery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GalleryEvent {
    /// An item's image finished loading.
    ImageLoaded(ItemId),
    /// An item's image failed to load.
    ImageFailed(ItemId),
    /// The intersection notifier reported a visible ratio for an item.
    Intersection { item: ItemId, ratio: f32 },
    /// An item's rendered size changed.
    SizeChanged(ItemId),
    /// The frame requested through the [`FrameScheduler`] arrived.
    AnimationFrame,
    /// The viewport was resized.
    ViewportResized,
    /// The load-more control was activated.
    LoadMoreActivated,
    /// The reduced-motion preference changed.
    ReducedMotionChanged(bool),
}

/// Collects collaborators and settings for a [`MasonryGallery`].
pub struct GalleryBuilder {
    catalog: SourceCatalog,
    config: GalleryConfig,
    frames: Box<dyn FrameScheduler>,
    surface: Option<Box<dyn GallerySurface>>,
    trigger: Option<Box<dyn LoadMoreTrigger>>,
    intersection: Option<Box<dyn IntersectionNotifier>>,
    size_changes: Option<Box<dyn SizeChangeNotifier>>,
    reduced_motion: bool,
}

impl GalleryBuilder {
    /// Start building a gallery over `catalog`.
    pub fn new(catalog: SourceCatalog, frames: impl FrameScheduler + 'static) -> Self {
        Self {
            catalog,
            config: GalleryConfig::default(),
            frames: Box::new(frames),
            surface: None,
            trigger: None,
            intersection: None,
            size_changes: None,
            reduced_motion: false,
        }
    }

    pub fn with_config(mut self, config: GalleryConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the container that receives gallery cells. Required.
    pub fn with_surface(mut self, surface: impl GallerySurface + 'static) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    pub fn with_trigger(mut self, trigger: impl LoadMoreTrigger + 'static) -> Self {
        self.trigger = Some(Box::new(trigger));
        self
    }

    /// Enable lazy reveal. Without a notifier items are visible on creation.
    pub fn with_intersection_notifier(
        mut self,
        notifier: impl IntersectionNotifier + 'static,
    ) -> Self {
        self.intersection = Some(Box::new(notifier));
        self
    }

    /// Enable remeasurement when an item's size changes after it loads.
    pub fn with_size_change_notifier(mut self, notifier: impl SizeChangeNotifier + 'static) -> Self {
        self.size_changes = Some(Box::new(notifier));
        self
    }

    /// The reduced-motion preference at startup.
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Shuffle the catalog and build the gallery.
    ///
    /// Returns `None` when no container surface was supplied. An invalid
    /// config is replaced by [`GalleryConfig::default`].
    pub fn mount<R: Rng + ?Sized>(self, rng: &mut R) -> Option<MasonryGallery> {
        let Some(surface) = self.surface else {
            tracing::debug!(target: "folio::gallery", "no gallery container; not mounting");
            return None;
        };

        let config = match self.config.validate() {
            Ok(()) => self.config,
            Err(error) => {
                tracing::warn!(
                    target: "folio::gallery",
                    %error,
                    "invalid gallery config; using defaults"
                );
                GalleryConfig::default()
            }
        };

        // With reduced motion at startup the notifier is never subscribed,
        // even if the preference later flips.
        let intersection = if self.reduced_motion {
            if self.intersection.is_some() {
                tracing::debug!(
                    target: "folio::gallery",
                    "reduced motion requested; lazy reveal disabled"
                );
            }
            None
        } else {
            self.intersection
        };

        let order = self.catalog.shuffled(rng);
        tracing::debug!(target: "folio::gallery", total = order.len(), "gallery mounted");

        Some(MasonryGallery {
            settle: Debouncer::new(config.resize_settle()),
            config,
            pages: Pagination::new(order),
            items: SlotMap::with_key(),
            order: Vec::new(),
            surface,
            trigger: self.trigger,
            intersection,
            size_changes: self.size_changes,
            frames: self.frames,
            measurements: MeasurementQueue::new(),
            pending_loads: 0,
            busy: false,
            initializing: true,
            started: false,
            reduced_motion: self.reduced_motion,
            exhausted_emitted: false,
            exhausted: Signal::new(),
        })
    }

    /// Shuffle with the thread-local generator and build the gallery.
    pub fn mount_shuffled(self) -> Option<MasonryGallery> {
        self.mount(&mut rand::thread_rng())
    }
}

/// A paginated, lazily revealed masonry gallery.
pub struct MasonryGallery {
    config: GalleryConfig,
    pages: Pagination,
    items: SlotMap<ItemId, GalleryItem>,
    /// Creation order.
    order: Vec<ItemId>,
    surface: Box<dyn GallerySurface>,
    trigger: Option<Box<dyn LoadMoreTrigger>>,
    intersection: Option<Box<dyn IntersectionNotifier>>,
    size_changes: Option<Box<dyn SizeChangeNotifier>>,
    frames: Box<dyn FrameScheduler>,
    measurements: MeasurementQueue,
    settle: Debouncer,
    pending_loads: usize,
    busy: bool,
    initializing: bool,
    started: bool,
    reduced_motion: bool,
    exhausted_emitted: bool,
    exhausted: Signal<usize>,
}

impl MasonryGallery {
    // ========================================================================
    // Startup and pagination
    // ========================================================================

    /// Append the initial page, or publish the empty state.
    ///
    /// Only the first call does anything. Returns the number of items
    /// appended.
    pub fn start(&mut self) -> usize {
        if self.started {
            return 0;
        }
        self.started = true;

        if self.pages.total() == 0 {
            tracing::debug!(target: "folio::gallery", "empty catalog; nothing to show");
            self.busy = false;
            self.surface.set_busy(false);
            self.clear_initializing();
            self.refresh_trigger();
            return 0;
        }

        self.append_batch(self.config.initial_batch_size)
    }

    /// Append up to `size` more entries from the presentation order.
    ///
    /// Returns the number actually appended. At the end of the order this
    /// appends nothing but still refreshes the trigger.
    pub fn append_batch(&mut self, size: usize) -> usize {
        let _perf = PerfSpan::new(span_names::APPEND_BATCH);
        self.started = true;

        let range = self.pages.next_range(size);
        let appended = range.len();
        if appended > 0 {
            self.set_busy(true);
            for position in range.clone() {
                self.create_item(position);
            }
            self.pages.advance_to(range.end);
        }

        self.clear_initializing();
        if self.pending_loads == 0 {
            self.set_busy(false);
        }
        self.refresh_trigger();

        tracing::debug!(
            target: "folio::gallery",
            appended,
            cursor = self.pages.cursor(),
            total = self.pages.total(),
            pending = self.pending_loads,
            "batch appended"
        );

        if appended > 0 && !self.pages.has_more() && !self.exhausted_emitted {
            self.exhausted_emitted = true;
            self.exhausted.emit(self.pages.total());
        }
        appended
    }

    /// Handle activation of the load-more control.
    ///
    /// The host must suppress the control's default navigation.
    pub fn activate_load_more(&mut self) -> DefaultAction {
        self.append_batch(self.config.repeat_batch_size);
        DefaultAction::Prevent
    }

    fn create_item(&mut self, position: usize) {
        let Some(source) = self.pages.order().get(position).map(str::to_owned) else {
            return;
        };
        let reveal_delay = (!self.reduced_motion).then(|| {
            stagger_delay(
                position,
                self.config.stagger_step(),
                self.config.stagger_cycle,
                self.config.stagger_cap(),
            )
        });

        let id = self.items.insert(GalleryItem::new(source.as_str(), position));
        self.order.push(id);

        let readiness = self.surface.append_item(&ItemSpec {
            id,
            source: &source,
            position,
            reveal_delay,
        });

        match readiness {
            ImageReadiness::Pending => {
                self.pending_loads += 1;
                self.observe_size(id);
            }
            ImageReadiness::Loaded => {
                self.set_load(id, LoadState::Loaded);
                self.observe_size(id);
                self.queue_measurement(id);
            }
            ImageReadiness::Broken => {
                tracing::debug!(target: "folio::gallery", %source, "cached image is broken");
                self.set_load(id, LoadState::Failed);
                self.reveal_now(id);
            }
        }

        let visible = self.items.get(id).is_some_and(|item| item.reveal().is_visible());
        if visible {
            return;
        }
        match self.intersection.as_mut() {
            Some(notifier) if !self.reduced_motion => {
                notifier.observe(id, self.config.reveal_threshold);
                if let Some(item) = self.items.get_mut(id) {
                    item.set_reveal(RevealState::Observing);
                }
            }
            _ => self.reveal_now(id),
        }
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Dispatch a host event. `now` is only read for resize events.
    pub fn handle_event(&mut self, event: GalleryEvent, now: Instant) -> DefaultAction {
        match event {
            GalleryEvent::ImageLoaded(item) => self.on_image_loaded(item),
            GalleryEvent::ImageFailed(item) => self.on_image_failed(item),
            GalleryEvent::Intersection { item, ratio } => self.on_intersection(item, ratio),
            GalleryEvent::SizeChanged(item) => self.on_size_changed(item),
            GalleryEvent::AnimationFrame => {
                self.on_animation_frame();
            }
            GalleryEvent::ViewportResized => self.on_viewport_resized(now),
            GalleryEvent::LoadMoreActivated => return self.activate_load_more(),
            GalleryEvent::ReducedMotionChanged(reduced) => self.set_reduced_motion(reduced),
        }
        DefaultAction::Allow
    }

    /// An item's image loaded.
    ///
    /// The first load settles the item's pending count; later loads (a
    /// responsive source swap) only queue a remeasure.
    pub fn on_image_loaded(&mut self, id: ItemId) {
        let Some(item) = self.items.get_mut(id) else {
            tracing::trace!(target: "folio::gallery", ?id, "load event for unknown item");
            return;
        };
        let previous = item.load();
        match previous {
            LoadState::Pending => {
                item.set_load(LoadState::Loaded);
                self.queue_measurement(id);
                self.load_settled();
            }
            LoadState::Loaded => self.queue_measurement(id),
            LoadState::Failed => {}
        }
    }

    /// An item's image failed. The item is shown as-is and never retried.
    pub fn on_image_failed(&mut self, id: ItemId) {
        let Some(item) = self.items.get_mut(id) else {
            tracing::trace!(target: "folio::gallery", ?id, "failure event for unknown item");
            return;
        };
        if item.load() != LoadState::Pending {
            return;
        }
        item.set_load(LoadState::Failed);
        tracing::debug!(target: "folio::gallery", source = item.source(), "image failed to load");

        self.reveal_now(id);
        if let Some(sizes) = self.size_changes.as_mut() {
            sizes.unobserve(id);
        }
        self.load_settled();
    }

    /// The intersection notifier reported `ratio` of `id` inside the viewport.
    pub fn on_intersection(&mut self, id: ItemId, ratio: f32) {
        let observing = self
            .items
            .get(id)
            .is_some_and(|item| item.reveal() == RevealState::Observing);
        if observing && ratio >= self.config.reveal_threshold {
            self.reveal_now(id);
        }
    }

    /// An item's rendered size changed.
    pub fn on_size_changed(&mut self, id: ItemId) {
        let measurable = self
            .items
            .get(id)
            .is_some_and(|item| item.load() != LoadState::Failed);
        if measurable {
            self.queue_measurement(id);
        }
    }

    /// Run the measurement flush for the frame requested earlier.
    ///
    /// Returns the number of row spans written.
    pub fn on_animation_frame(&mut self) -> usize {
        let batch = self.measurements.take_batch();
        if batch.is_empty() {
            return 0;
        }
        let _perf = PerfSpan::new(span_names::MEASURE_FLUSH);

        let metrics = GridMetrics::resolve(
            self.surface.grid_metrics(),
            self.config.fallback_row_height,
            self.config.fallback_row_gap,
        );

        let mut written = 0;
        for id in batch {
            let Some(item) = self.items.get_mut(id) else {
                continue;
            };
            let Some(height) = self
                .surface
                .content_height(id)
                .filter(|h| h.is_finite() && *h > 0.0)
            else {
                continue;
            };
            let span = metrics.row_span(height);
            item.set_row_span(span);
            self.surface.set_row_span(id, span);
            written += 1;
        }

        tracing::trace!(
            target: "folio::gallery",
            written,
            row_height = metrics.row_height(),
            row_gap = metrics.row_gap(),
            "measurement flush"
        );
        written
    }

    /// The viewport was resized at `now`; schedules a whole-gallery
    /// remeasure once resizing has been quiet for the settle period.
    pub fn on_viewport_resized(&mut self, now: Instant) {
        self.settle.trigger(now);
    }

    /// Fire the resize settle timer if it is due.
    ///
    /// Returns `true` if a whole-gallery remeasure was queued.
    pub fn poll_timers(&mut self, now: Instant) -> bool {
        if !self.settle.poll(now) {
            return false;
        }
        tracing::debug!(target: "folio::gallery", items = self.order.len(), "resize settled");
        self.remeasure_all();
        true
    }

    /// Time until [`poll_timers`](Self::poll_timers) has work to do.
    pub fn next_timer_deadline(&self, now: Instant) -> Option<Duration> {
        self.settle.time_until_fire(now)
    }

    /// Queue every item for measurement, in creation order.
    pub fn remeasure_all(&mut self) {
        for &id in &self.order {
            self.measurements.enqueue(id, self.frames.as_mut());
        }
    }

    /// Update the live reduced-motion preference.
    ///
    /// Governs items created from now on. Items already observing keep
    /// waiting for their intersection.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        if self.reduced_motion != reduced {
            tracing::debug!(target: "folio::gallery", reduced, "reduced motion changed");
        }
        self.reduced_motion = reduced;
    }

    // ========================================================================
    // Internal transitions
    // ========================================================================

    fn queue_measurement(&mut self, id: ItemId) {
        self.measurements.enqueue(id, self.frames.as_mut());
    }

    fn observe_size(&mut self, id: ItemId) {
        if let Some(sizes) = self.size_changes.as_mut() {
            sizes.observe(id);
        }
    }

    fn set_load(&mut self, id: ItemId, load: LoadState) {
        if let Some(item) = self.items.get_mut(id) {
            item.set_load(load);
        }
    }

    fn reveal_now(&mut self, id: ItemId) {
        let Some(item) = self.items.get_mut(id) else {
            return;
        };
        match item.reveal() {
            RevealState::Visible => return,
            RevealState::Observing => {
                if let Some(notifier) = self.intersection.as_mut() {
                    notifier.unobserve(id);
                }
            }
            RevealState::Unobserved => {}
        }
        item.set_reveal(RevealState::Visible);
        self.surface.reveal(id);
    }

    fn load_settled(&mut self) {
        debug_assert!(self.pending_loads > 0, "load settled with nothing pending");
        self.pending_loads = self.pending_loads.saturating_sub(1);
        if self.pending_loads == 0 {
            self.set_busy(false);
        }
    }

    fn set_busy(&mut self, busy: bool) {
        if self.busy != busy {
            self.busy = busy;
            self.surface.set_busy(busy);
        }
    }

    fn clear_initializing(&mut self) {
        if self.initializing {
            self.initializing = false;
            self.surface.set_initializing(false);
        }
    }

    fn refresh_trigger(&mut self) {
        let state = self.trigger_state();
        if let Some(trigger) = self.trigger.as_mut() {
            trigger.set_state(state);
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of presentation-order entries appended so far.
    pub fn cursor(&self) -> usize {
        self.pages.cursor()
    }

    /// Size of the catalog.
    pub fn total(&self) -> usize {
        self.pages.total()
    }

    pub fn has_more(&self) -> bool {
        self.pages.has_more()
    }

    /// Items whose image has neither loaded nor failed.
    pub fn pending_loads(&self) -> usize {
        self.pending_loads
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_initializing(&self) -> bool {
        self.initializing
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Whether lazy reveal is in play for this gallery.
    pub fn has_intersection_notifier(&self) -> bool {
        self.intersection.is_some()
    }

    /// The state the load-more control should show.
    pub fn trigger_state(&self) -> TriggerState {
        TriggerState::for_remaining(self.pages.has_more())
    }

    pub fn presentation_order(&self) -> &PresentationOrder {
        self.pages.order()
    }

    pub fn item(&self, id: ItemId) -> Option<&GalleryItem> {
        self.items.get(id)
    }

    /// Items in creation order.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &GalleryItem)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.items.get(id).map(|item| (id, item)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Items waiting for the next measurement flush.
    pub fn measurement_backlog(&self) -> usize {
        self.measurements.len()
    }

    /// Whether a measurement frame is outstanding.
    pub fn is_flush_scheduled(&self) -> bool {
        self.measurements.is_scheduled()
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// Emitted once, with the catalog size, when the last entry is appended.
    pub fn exhausted(&self) -> &Signal<usize> {
        &self.exhausted
    }
}

impl std::fmt::Debug for MasonryGallery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasonryGallery")
            .field("cursor", &self.pages.cursor())
            .field("total", &self.pages.total())
            .field("pending_loads", &self.pending_loads)
            .field("busy", &self.busy)
            .field("reduced_motion", &self.reduced_motion)
            .finish_non_exhaustive()
    }
}
