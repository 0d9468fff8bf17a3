//! Parallax scrolling for the hero background.
//!
//! The hero's background image drifts vertically as the page scrolls. How far
//! it drifts depends on the viewport width: narrow screens get a stronger
//! effect so it stays noticeable. Scroll and resize bursts are coalesced to
//! one position update per animation frame.

use std::fmt;

use folio_core::{FrameRequest, FrameScheduler};

/// Parallax tuning for one viewport width band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxSettings {
    /// Scales the scroll-derived movement.
    pub multiplier: f32,
    /// Fixed horizontal background position, percent.
    pub base_horizontal: f32,
    /// Vertical background position at scroll offset zero, percent.
    pub base_vertical: f32,
    /// Pixels of scroll per unit of movement.
    pub scroll_divider: f32,
}

/// Width bands, narrowest first: `(max width, settings)`.
const BREAKPOINTS: [(f32, ParallaxSettings); 5] = [
    (320.0, settings(3.0, 15.0, 25.0, 40.0)),
    (480.0, settings(2.5, 15.0, 22.0, 44.0)),
    (768.0, settings(2.0, 15.0, 20.0, 50.0)),
    (1024.0, settings(1.25, 18.0, 25.0, 60.0)),
    (1440.0, settings(1.0, 20.0, 29.0, 70.0)),
];

const WIDE: ParallaxSettings = settings(0.75, 20.0, 29.0, 80.0);

const fn settings(
    multiplier: f32,
    base_horizontal: f32,
    base_vertical: f32,
    scroll_divider: f32,
) -> ParallaxSettings {
    ParallaxSettings {
        multiplier,
        base_horizontal,
        base_vertical,
        scroll_divider,
    }
}

impl ParallaxSettings {
    /// Settings for a viewport `width` pixels wide.
    pub fn for_viewport_width(width: f32) -> Self {
        BREAKPOINTS
            .iter()
            .find(|(max_width, _)| width <= *max_width)
            .map_or(WIDE, |(_, settings)| *settings)
    }

    /// Background position at vertical scroll offset `scroll_y`.
    pub fn position(&self, scroll_y: f32) -> BackgroundPosition {
        let movement = scroll_y / self.scroll_divider * self.multiplier;
        let vertical = self.base_vertical + movement;
        BackgroundPosition {
            horizontal: self.base_horizontal,
            vertical: if vertical.is_finite() {
                vertical.clamp(0.0, 100.0)
            } else {
                self.base_vertical
            },
        }
    }
}

/// A CSS `background-position` in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundPosition {
    pub horizontal: f32,
    pub vertical: f32,
}

impl fmt::Display for BackgroundPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}% {}%", self.horizontal, self.vertical)
    }
}

/// The hero element.
pub trait HeroSurface {
    fn set_background_position(&mut self, position: BackgroundPosition);
}

/// Drives the hero's background position from scroll events.
pub struct ParallaxHero {
    surface: Box<dyn HeroSurface>,
    frames: Box<dyn FrameScheduler>,
    frame: FrameRequest,
    position: Option<BackgroundPosition>,
}

impl ParallaxHero {
    /// Attach to the hero and request the initial update.
    pub fn mount(surface: impl HeroSurface + 'static, frames: impl FrameScheduler + 'static) -> Self {
        let mut hero = Self {
            surface: Box::new(surface),
            frames: Box::new(frames),
            frame: FrameRequest::new(),
            position: None,
        };
        hero.request_tick();
        hero
    }

    /// A scroll or resize happened; update on the next frame.
    ///
    /// Returns `true` if a new frame was requested.
    pub fn request_tick(&mut self) -> bool {
        self.frame.schedule(self.frames.as_mut())
    }

    /// Apply the position for the current scroll offset and viewport width.
    pub fn on_animation_frame(&mut self, scroll_y: f32, viewport_width: f32) {
        if !self.frame.complete() {
            return;
        }
        let position = ParallaxSettings::for_viewport_width(viewport_width).position(scroll_y);
        tracing::trace!(target: "folio::parallax", %position, "parallax update");
        self.position = Some(position);
        self.surface.set_background_position(position);
    }

    /// The last applied position.
    pub fn position(&self) -> Option<BackgroundPosition> {
        self.position
    }
}

impl fmt::Debug for ParallaxHero {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParallaxHero")
            .field("frame", &self.frame)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}
