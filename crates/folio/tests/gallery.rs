//! Integration tests for the masonry gallery, driven through fake
//! collaborators that record every call.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use folio::config::GalleryConfig;
use folio::widget::DefaultAction;
use folio::widget::gallery::{
    GalleryBuilder, GalleryEvent, GallerySurface, ImageReadiness, IntersectionNotifier, ItemId,
    ItemSpec, LoadMoreTrigger, LoadState, MasonryGallery, RawGridMetrics, RevealState,
    SizeChangeNotifier, SourceCatalog, TriggerState,
};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// Fakes
// ============================================================================

#[derive(Debug, Clone)]
struct Appended {
    id: ItemId,
    source: String,
    reveal_delay: Option<Duration>,
}

#[derive(Default)]
struct SurfaceLog {
    appended: Vec<Appended>,
    busy: Vec<bool>,
    initializing: Vec<bool>,
    revealed: Vec<ItemId>,
    spans: Vec<(ItemId, u32)>,
    metrics_reads: Cell<usize>,
    metrics: RawGridMetrics,
    heights: HashMap<ItemId, f32>,
    default_height: Option<f32>,
    readiness: HashMap<usize, ImageReadiness>,
}

#[derive(Clone, Default)]
struct FakeSurface(Rc<RefCell<SurfaceLog>>);

impl GallerySurface for FakeSurface {
    fn append_item(&mut self, spec: &ItemSpec<'_>) -> ImageReadiness {
        let mut log = self.0.borrow_mut();
        log.appended.push(Appended {
            id: spec.id,
            source: spec.source.to_owned(),
            reveal_delay: spec.reveal_delay,
        });
        log.readiness
            .get(&spec.position)
            .copied()
            .unwrap_or(ImageReadiness::Pending)
    }

    fn set_busy(&mut self, busy: bool) {
        self.0.borrow_mut().busy.push(busy);
    }

    fn set_initializing(&mut self, initializing: bool) {
        self.0.borrow_mut().initializing.push(initializing);
    }

    fn reveal(&mut self, item: ItemId) {
        self.0.borrow_mut().revealed.push(item);
    }

    fn grid_metrics(&self) -> RawGridMetrics {
        let log = self.0.borrow();
        log.metrics_reads.set(log.metrics_reads.get() + 1);
        log.metrics
    }

    fn content_height(&self, item: ItemId) -> Option<f32> {
        let log = self.0.borrow();
        log.heights.get(&item).copied().or(log.default_height)
    }

    fn set_row_span(&mut self, item: ItemId, span: u32) {
        self.0.borrow_mut().spans.push((item, span));
    }
}

#[derive(Clone, Default)]
struct FakeTrigger(Rc<RefCell<Vec<TriggerState>>>);

impl LoadMoreTrigger for FakeTrigger {
    fn set_state(&mut self, state: TriggerState) {
        self.0.borrow_mut().push(state);
    }
}

#[derive(Default)]
struct NotifierLog {
    observed: Vec<ItemId>,
    unobserved: Vec<ItemId>,
    thresholds: Vec<f32>,
}

#[derive(Clone, Default)]
struct FakeIntersections(Rc<RefCell<NotifierLog>>);

impl IntersectionNotifier for FakeIntersections {
    fn observe(&mut self, item: ItemId, threshold: f32) {
        let mut log = self.0.borrow_mut();
        log.observed.push(item);
        log.thresholds.push(threshold);
    }

    fn unobserve(&mut self, item: ItemId) {
        self.0.borrow_mut().unobserved.push(item);
    }
}

#[derive(Clone, Default)]
struct FakeSizes(Rc<RefCell<NotifierLog>>);

impl SizeChangeNotifier for FakeSizes {
    fn observe(&mut self, item: ItemId) {
        self.0.borrow_mut().observed.push(item);
    }

    fn unobserve(&mut self, item: ItemId) {
        self.0.borrow_mut().unobserved.push(item);
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    gallery: MasonryGallery,
    surface: FakeSurface,
    trigger: FakeTrigger,
    intersections: FakeIntersections,
    sizes: FakeSizes,
    frames: Rc<Cell<usize>>,
}

struct Setup {
    total: usize,
    config: GalleryConfig,
    reduced_motion: bool,
    intersections: bool,
    sizes: bool,
    surface: SurfaceLog,
}

impl Setup {
    fn new(total: usize) -> Self {
        Self {
            total,
            config: GalleryConfig::default(),
            reduced_motion: false,
            intersections: true,
            sizes: true,
            surface: SurfaceLog::default(),
        }
    }

    fn mount(self) -> Harness {
        let surface = FakeSurface(Rc::new(RefCell::new(self.surface)));
        let trigger = FakeTrigger::default();
        let intersections = FakeIntersections::default();
        let sizes = FakeSizes::default();
        let frames = Rc::new(Cell::new(0));

        let frames_clone = frames.clone();
        let catalog: SourceCatalog = (0..self.total).map(|n| format!("review-{n:03}.png")).collect();
        let mut builder = GalleryBuilder::new(catalog, move || {
            frames_clone.set(frames_clone.get() + 1)
        })
        .with_config(self.config)
        .with_surface(surface.clone())
        .with_trigger(trigger.clone())
        .with_reduced_motion(self.reduced_motion);
        if self.intersections {
            builder = builder.with_intersection_notifier(intersections.clone());
        }
        if self.sizes {
            builder = builder.with_size_change_notifier(sizes.clone());
        }

        let gallery = builder
            .mount(&mut StdRng::seed_from_u64(0x5eed))
            .expect("surface supplied");

        Harness {
            gallery,
            surface,
            trigger,
            intersections,
            sizes,
            frames,
        }
    }
}

impl Harness {
    fn started(total: usize) -> Self {
        let mut harness = Setup::new(total).mount();
        harness.gallery.start();
        harness
    }

    fn ids(&self) -> Vec<ItemId> {
        self.gallery.items().map(|(id, _)| id).collect()
    }

    fn last_trigger(&self) -> Option<TriggerState> {
        self.trigger.0.borrow().last().copied()
    }

    fn last_busy(&self) -> Option<bool> {
        self.surface.0.borrow().busy.last().copied()
    }

    fn assert_busy_matches_counter(&self) {
        let pending = self
            .gallery
            .items()
            .filter(|(_, item)| item.load() == LoadState::Pending)
            .count();
        assert_eq!(self.gallery.pending_loads(), pending);
        assert_eq!(self.gallery.is_busy(), pending > 0);
        assert_eq!(self.last_busy().unwrap_or(false), pending > 0);
    }
}

fn visible() -> TriggerState {
    TriggerState::for_remaining(true)
}

fn hidden() -> TriggerState {
    TriggerState::for_remaining(false)
}

// ============================================================================
// Mounting and ordering
// ============================================================================

#[test]
fn test_mount_without_surface_does_nothing() {
    let catalog = SourceCatalog::new(["a.png"]);
    let gallery = GalleryBuilder::new(catalog, || {})
        .with_trigger(FakeTrigger::default())
        .mount(&mut StdRng::seed_from_u64(1));
    assert!(gallery.is_none());
}

#[test]
fn test_presentation_order_is_a_permutation() {
    let harness = Harness::started(40);
    let order = harness.gallery.presentation_order();

    let mut shown = order.as_slice().to_vec();
    shown.sort();
    let expected: Vec<String> = (0..40).map(|n| format!("review-{n:03}.png")).collect();
    assert_eq!(shown, expected);

    // Items are appended in presentation order.
    let appended: Vec<String> = harness
        .surface
        .0
        .borrow()
        .appended
        .iter()
        .map(|a| a.source.clone())
        .collect();
    assert_eq!(appended, order.as_slice()[..24].to_vec());
}

#[test]
fn test_order_is_fixed_across_batches() {
    let mut harness = Harness::started(60);
    let before = harness.gallery.presentation_order().clone();
    harness.gallery.activate_load_more();
    harness.gallery.activate_load_more();
    assert_eq!(harness.gallery.presentation_order(), &before);

    for (position, (_, item)) in harness.gallery.items().enumerate() {
        assert_eq!(item.position(), position);
        assert_eq!(Some(item.source()), before.get(position));
    }
}

// ============================================================================
// Pagination
// ============================================================================

#[test]
fn test_pagination_150_entries() {
    let mut harness = Harness::started(150);
    let exhausted = Arc::new(Mutex::new(Vec::new()));
    let exhausted_clone = exhausted.clone();
    harness
        .gallery
        .exhausted()
        .connect(move |&total| exhausted_clone.lock().push(total));

    assert_eq!(harness.gallery.cursor(), 24);
    assert_eq!(harness.last_trigger(), Some(visible()));

    assert_eq!(harness.gallery.activate_load_more(), DefaultAction::Prevent);
    assert_eq!(harness.gallery.cursor(), 36);

    for _ in 1..10 {
        harness.gallery.activate_load_more();
    }
    assert_eq!(harness.gallery.cursor(), 144);
    assert_eq!(harness.last_trigger(), Some(visible()));
    assert!(exhausted.lock().is_empty());

    harness.gallery.activate_load_more();
    assert_eq!(harness.gallery.cursor(), 150);
    assert_eq!(harness.last_trigger(), Some(hidden()));
    assert_eq!(*exhausted.lock(), vec![150]);

    let refreshes = harness.trigger.0.borrow().len();
    harness.gallery.activate_load_more();
    assert_eq!(harness.gallery.cursor(), 150);
    assert_eq!(harness.gallery.len(), 150);
    // The no-op append still refreshes the trigger.
    assert_eq!(harness.trigger.0.borrow().len(), refreshes + 1);
    assert_eq!(harness.last_trigger(), Some(hidden()));
    assert_eq!(*exhausted.lock(), vec![150]);
}

#[test]
fn test_small_catalog_exhausts_on_start() {
    let harness = Harness::started(10);
    assert_eq!(harness.gallery.cursor(), 10);
    assert!(!harness.gallery.has_more());
    assert_eq!(harness.last_trigger(), Some(hidden()));
}

#[test]
fn test_start_runs_once() {
    let mut harness = Harness::started(30);
    assert_eq!(harness.gallery.start(), 0);
    assert_eq!(harness.gallery.cursor(), 24);
}

#[test]
fn test_configured_batch_sizes() {
    let mut setup = Setup::new(20);
    setup.config.initial_batch_size = 5;
    setup.config.repeat_batch_size = 4;
    let mut harness = setup.mount();

    assert_eq!(harness.gallery.start(), 5);
    assert_eq!(
        harness.gallery.handle_event(GalleryEvent::LoadMoreActivated, Instant::now()),
        DefaultAction::Prevent
    );
    assert_eq!(harness.gallery.cursor(), 9);
}

#[test]
fn test_invalid_threshold_falls_back_to_defaults() {
    let mut setup = Setup::new(5);
    setup.config.reveal_threshold = 1.5;
    let mut harness = setup.mount();
    harness.gallery.start();

    assert_eq!(harness.gallery.config(), &GalleryConfig::default());
    let id = harness.ids()[0];
    harness.gallery.on_intersection(id, 1.0);
    assert_eq!(
        harness.gallery.item(id).map(|item| item.reveal()),
        Some(RevealState::Visible)
    );
}

#[test]
fn test_zero_initial_batch_falls_back_to_defaults() {
    let mut setup = Setup::new(30);
    setup.config.initial_batch_size = 0;
    let mut harness = setup.mount();

    assert_eq!(harness.gallery.start(), 24);
    assert_eq!(harness.gallery.cursor(), 24);
    assert_eq!(harness.gallery.len(), 24);
    assert_eq!(harness.last_trigger(), Some(visible()));
}

#[test]
fn test_empty_catalog() {
    let harness = Harness::started(0);
    let surface = harness.surface.0.borrow();

    assert!(harness.gallery.is_empty());
    assert!(surface.appended.is_empty());
    assert_eq!(surface.busy, vec![false]);
    assert_eq!(surface.initializing, vec![false]);
    assert!(!harness.gallery.is_initializing());
    assert_eq!(harness.last_trigger(), Some(hidden()));
}

#[test]
fn test_initializing_cleared_once() {
    let mut harness = Harness::started(50);
    harness.gallery.activate_load_more();
    assert_eq!(harness.surface.0.borrow().initializing, vec![false]);
}

// ============================================================================
// Load lifecycle and busy counter
// ============================================================================

#[test]
fn test_busy_set_before_items_and_cleared_after_loads() {
    let mut harness = Harness::started(3);
    assert_eq!(harness.surface.0.borrow().busy, vec![true]);
    assert_eq!(harness.gallery.pending_loads(), 3);

    let ids = harness.ids();
    harness.gallery.on_image_loaded(ids[0]);
    harness.gallery.on_image_failed(ids[1]);
    assert!(harness.gallery.is_busy());
    harness.gallery.on_image_loaded(ids[2]);

    assert!(!harness.gallery.is_busy());
    assert_eq!(harness.surface.0.borrow().busy, vec![true, false]);
}

#[test]
fn test_busy_tracks_counter_under_random_interleavings() {
    for seed in 0..20 {
        let mut harness = Harness::started(80);
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..200 {
            if rng.gen_bool(0.05) {
                harness.gallery.activate_load_more();
            } else {
                let ids = harness.ids();
                let id = ids[rng.gen_range(0..ids.len())];
                if rng.gen_bool(0.7) {
                    harness.gallery.on_image_loaded(id);
                } else {
                    harness.gallery.on_image_failed(id);
                }
            }
            harness.assert_busy_matches_counter();
        }
    }
}

#[test]
fn test_duplicate_events_count_once() {
    let mut harness = Harness::started(2);
    let ids = harness.ids();

    harness.gallery.on_image_failed(ids[0]);
    harness.gallery.on_image_failed(ids[0]);
    harness.gallery.on_image_loaded(ids[0]);
    assert_eq!(harness.gallery.pending_loads(), 1);
    assert!(harness.gallery.is_busy());

    harness.gallery.on_image_loaded(ids[1]);
    harness.gallery.on_image_loaded(ids[1]);
    assert_eq!(harness.gallery.pending_loads(), 0);
    harness.assert_busy_matches_counter();
}

#[test]
fn test_failure_forces_visible_and_detaches() {
    let mut harness = Harness::started(30);
    let failed = harness.ids()[4];
    assert_eq!(
        harness.gallery.item(failed).map(|item| item.reveal()),
        Some(RevealState::Observing)
    );

    harness.gallery.on_image_failed(failed);

    let item = harness.gallery.item(failed).unwrap();
    assert_eq!(item.reveal(), RevealState::Visible);
    assert_eq!(item.load(), LoadState::Failed);
    assert!(harness.surface.0.borrow().revealed.contains(&failed));
    assert!(harness.intersections.0.borrow().unobserved.contains(&failed));
    assert!(harness.sizes.0.borrow().unobserved.contains(&failed));

    // Size changes of a failed item are not measured.
    harness.gallery.on_size_changed(failed);
    assert_eq!(harness.gallery.measurement_backlog(), 0);

    // A failure never blocks later appends.
    assert_eq!(harness.gallery.append_batch(12), 6);
    assert_eq!(harness.gallery.cursor(), 30);
}

#[test]
fn test_already_complete_images_are_not_counted() {
    let mut setup = Setup::new(4);
    setup.surface.readiness.insert(0, ImageReadiness::Loaded);
    setup.surface.readiness.insert(1, ImageReadiness::Broken);
    let mut harness = setup.mount();
    harness.gallery.start();

    let ids = harness.ids();
    assert_eq!(harness.gallery.pending_loads(), 2);

    let cached = harness.gallery.item(ids[0]).unwrap();
    assert_eq!(cached.load(), LoadState::Loaded);
    assert_eq!(harness.gallery.measurement_backlog(), 1);
    assert!(harness.gallery.is_flush_scheduled());

    let broken = harness.gallery.item(ids[1]).unwrap();
    assert_eq!(broken.load(), LoadState::Failed);
    assert_eq!(broken.reveal(), RevealState::Visible);
    assert!(!harness.intersections.0.borrow().observed.contains(&ids[1]));
}

#[test]
fn test_all_cached_batch_is_never_busy() {
    let mut setup = Setup::new(3);
    for position in 0..3 {
        setup.surface.readiness.insert(position, ImageReadiness::Loaded);
    }
    let mut harness = setup.mount();
    harness.gallery.start();

    assert!(!harness.gallery.is_busy());
    assert_eq!(harness.surface.0.borrow().busy, vec![true, false]);
}

// ============================================================================
// Lazy reveal
// ============================================================================

#[test]
fn test_intersection_reveals_once() {
    let mut harness = Harness::started(5);
    let id = harness.ids()[2];
    {
        let log = harness.intersections.0.borrow();
        assert_eq!(log.observed.len(), 5);
        assert!(log.thresholds.iter().all(|t| *t == 0.15));
    }

    harness.gallery.on_intersection(id, 0.1);
    assert_eq!(
        harness.gallery.item(id).map(|item| item.reveal()),
        Some(RevealState::Observing)
    );

    harness.gallery.on_intersection(id, 0.15);
    assert_eq!(
        harness.gallery.item(id).map(|item| item.reveal()),
        Some(RevealState::Visible)
    );
    assert_eq!(harness.intersections.0.borrow().unobserved, vec![id]);

    harness.gallery.on_intersection(id, 1.0);
    assert_eq!(harness.surface.0.borrow().revealed, vec![id]);
    assert_eq!(harness.intersections.0.borrow().unobserved, vec![id]);
}

#[test]
fn test_reduced_motion_at_startup() {
    let mut setup = Setup::new(50);
    setup.reduced_motion = true;
    let mut harness = setup.mount();
    harness.gallery.start();
    harness.gallery.activate_load_more();

    assert!(!harness.gallery.has_intersection_notifier());
    assert!(harness.intersections.0.borrow().observed.is_empty());
    assert!(
        harness
            .gallery
            .items()
            .all(|(_, item)| item.reveal() == RevealState::Visible)
    );
    assert!(
        harness
            .surface
            .0
            .borrow()
            .appended
            .iter()
            .all(|a| a.reveal_delay.is_none())
    );

    // The notifier stays unused even once the preference flips back.
    harness.gallery.set_reduced_motion(false);
    assert_eq!(harness.gallery.append_batch(12), 12);
    assert!(harness.intersections.0.borrow().observed.is_empty());
    let surface = harness.surface.0.borrow();
    assert!(surface.appended[36..].iter().all(|a| a.reveal_delay.is_some()));
    assert_eq!(surface.revealed.len(), 48);
}

#[test]
fn test_missing_intersection_notifier_reveals_immediately() {
    let mut setup = Setup::new(6);
    setup.intersections = false;
    let mut harness = setup.mount();
    harness.gallery.start();

    assert_eq!(harness.surface.0.borrow().revealed.len(), 6);
    // Stagger still applies; only the trigger for it is missing.
    let delays: Vec<_> = harness
        .surface
        .0
        .borrow()
        .appended
        .iter()
        .map(|a| a.reveal_delay)
        .collect();
    assert_eq!(delays[1], Some(Duration::from_millis(45)));
}

#[test]
fn test_reduced_motion_change_governs_new_items() {
    let mut harness = Harness::started(40);
    harness
        .gallery
        .handle_event(GalleryEvent::ReducedMotionChanged(true), Instant::now());
    harness.gallery.activate_load_more();

    let ids = harness.ids();
    for id in &ids[..24] {
        assert_eq!(
            harness.gallery.item(*id).map(|item| item.reveal()),
            Some(RevealState::Observing)
        );
    }
    for id in &ids[24..] {
        assert_eq!(
            harness.gallery.item(*id).map(|item| item.reveal()),
            Some(RevealState::Visible)
        );
    }
    let surface = harness.surface.0.borrow();
    assert!(surface.appended[24..].iter().all(|a| a.reveal_delay.is_none()));

    // Earlier items still reveal through their intersection.
    drop(surface);
    harness.gallery.on_intersection(ids[0], 0.5);
    assert_eq!(
        harness.gallery.item(ids[0]).map(|item| item.reveal()),
        Some(RevealState::Visible)
    );
}

#[test]
fn test_stagger_delays() {
    let harness = Harness::started(24);
    let delays: Vec<u128> = harness
        .surface
        .0
        .borrow()
        .appended
        .iter()
        .map(|a| a.reveal_delay.unwrap().as_millis())
        .collect();
    assert_eq!(&delays[..9], &[0, 45, 90, 135, 180, 225, 270, 315, 320]);
    assert_eq!(delays[11], 320);
    assert_eq!(delays[12], 0);
    assert_eq!(delays[13], 45);
}

// ============================================================================
// Measurement
// ============================================================================

#[test]
fn test_duplicate_size_changes_coalesce() {
    let mut setup = Setup::new(3);
    setup.surface.metrics = RawGridMetrics {
        row_height: Some(8.0),
        row_gap: Some(16.0),
    };
    setup.surface.default_height = Some(300.0);
    let mut harness = setup.mount();
    harness.gallery.start();
    let id = harness.ids()[0];

    harness.gallery.on_size_changed(id);
    harness.gallery.on_size_changed(id);
    assert_eq!(harness.frames.get(), 1);
    assert_eq!(harness.gallery.measurement_backlog(), 1);

    assert_eq!(harness.gallery.on_animation_frame(), 1);
    let surface = harness.surface.0.borrow();
    assert_eq!(surface.spans, vec![(id, 14)]);
    assert_eq!(surface.metrics_reads.get(), 1);
    drop(surface);

    assert_eq!(harness.gallery.item(id).map(|item| item.row_span()), Some(14));
    assert!(!harness.gallery.is_flush_scheduled());
}

#[test]
fn test_one_metrics_read_per_flush() {
    let mut setup = Setup::new(10);
    setup.surface.default_height = Some(120.0);
    let mut harness = setup.mount();
    harness.gallery.start();

    for id in harness.ids() {
        harness.gallery.on_image_loaded(id);
    }
    assert_eq!(harness.frames.get(), 1);
    assert_eq!(harness.gallery.on_animation_frame(), 10);
    assert_eq!(harness.surface.0.borrow().metrics_reads.get(), 1);

    // An empty frame does not read metrics.
    assert_eq!(harness.gallery.on_animation_frame(), 0);
    assert_eq!(harness.surface.0.borrow().metrics_reads.get(), 1);
}

#[test]
fn test_flush_falls_back_on_bad_metrics() {
    let mut setup = Setup::new(1);
    setup.surface.metrics = RawGridMetrics {
        row_height: Some(f32::NAN),
        row_gap: None,
    };
    setup.surface.default_height = Some(100.0);
    let mut harness = setup.mount();
    harness.gallery.start();
    let id = harness.ids()[0];

    harness.gallery.on_image_loaded(id);
    harness.gallery.on_animation_frame();
    // ceil((100 + 16) / (16 + 16)) = 4
    assert_eq!(harness.surface.0.borrow().spans, vec![(id, 4)]);
}

#[test]
fn test_flush_skips_items_without_content() {
    let mut harness = Harness::started(3);
    let ids = harness.ids();
    harness
        .surface
        .0
        .borrow_mut()
        .heights
        .extend([(ids[0], 0.0), (ids[2], 40.0)]);

    for id in &ids {
        harness.gallery.on_image_loaded(*id);
    }
    assert_eq!(harness.gallery.on_animation_frame(), 1);
    let spans = harness.surface.0.borrow().spans.clone();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].0, ids[2]);
    assert_eq!(harness.gallery.item(ids[0]).map(|item| item.row_span()), Some(1));
}

#[test]
fn test_resize_remeasures_everything_after_quiet_period() {
    let mut setup = Setup::new(5);
    setup.surface.default_height = Some(50.0);
    let mut harness = setup.mount();
    harness.gallery.start();
    let t0 = Instant::now();
    let ms = Duration::from_millis;

    harness.gallery.on_viewport_resized(t0);
    harness
        .gallery
        .handle_event(GalleryEvent::ViewportResized, t0 + ms(100));
    assert!(!harness.gallery.poll_timers(t0 + ms(180)));
    assert_eq!(harness.gallery.next_timer_deadline(t0 + ms(180)), Some(ms(100)));
    assert_eq!(harness.frames.get(), 0);

    assert!(harness.gallery.poll_timers(t0 + ms(280)));
    assert_eq!(harness.gallery.measurement_backlog(), 5);
    assert_eq!(harness.frames.get(), 1);
    assert!(!harness.gallery.poll_timers(t0 + ms(400)));

    harness
        .gallery
        .handle_event(GalleryEvent::AnimationFrame, t0 + ms(290));
    let written: Vec<ItemId> = harness
        .surface
        .0
        .borrow()
        .spans
        .iter()
        .map(|(id, _)| *id)
        .collect();
    assert_eq!(written, harness.ids());
}

#[test]
fn test_size_observation_attached_on_creation() {
    let harness = Harness::started(7);
    let appended: Vec<ItemId> = harness.surface.0.borrow().appended.iter().map(|a| a.id).collect();
    assert_eq!(appended, harness.ids());
    assert_eq!(harness.sizes.0.borrow().observed, harness.ids());
}

#[test]
fn test_missing_size_notifier_still_measures_initial_load() {
    let mut setup = Setup::new(2);
    setup.sizes = false;
    setup.surface.default_height = Some(64.0);
    let mut harness = setup.mount();
    harness.gallery.start();

    let id = harness.ids()[1];
    harness.gallery.on_image_loaded(id);
    assert_eq!(harness.gallery.on_animation_frame(), 1);
}
