//! Anchor link resolution and URL-fragment arrival.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use folio_core::{TimerId, TimerManager};

use crate::widget::DefaultAction;

/// Fragment that opens the survey popup instead of scrolling.
pub const CONTACT_HASH: &str = "#contact";

/// Delay before acting on a URL fragment, letting layout settle.
pub const ARRIVAL_DELAY: Duration = Duration::from_millis(100);

/// Additional delay before the popup opens on a `#contact` arrival.
pub const POPUP_SETTLE_DELAY: Duration = Duration::from_millis(150);

/// What a click on a link should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorAction {
    /// Not a fragment link; leave it to the browser.
    Ignore,
    /// Load another page at the given href.
    Navigate(String),
    /// Smooth-scroll to the section with this id, if it exists.
    ScrollTo { section: String, open_popup: bool },
    /// A bare `#`: suppress the jump and do nothing.
    Suppress,
}

impl AnchorAction {
    pub fn default_action(&self) -> DefaultAction {
        match self {
            AnchorAction::Ignore => DefaultAction::Allow,
            _ => DefaultAction::Prevent,
        }
    }
}

/// Decide what a click on a link with `href` does on `current_page`.
pub fn resolve_anchor(href: &str, current_page: &str) -> AnchorAction {
    let Some((page, fragment)) = href.split_once('#') else {
        return AnchorAction::Ignore;
    };

    if !page.is_empty() && page != current_page {
        return AnchorAction::Navigate(href.to_owned());
    }
    if fragment.is_empty() {
        return AnchorAction::Suppress;
    }

    AnchorAction::ScrollTo {
        section: fragment.to_owned(),
        // Only the bare same-page link doubles as the popup trigger.
        open_popup: page.is_empty() && href == CONTACT_HASH,
    }
}

/// Scroll offset that puts a section's top just under the navigation bar.
pub fn scroll_offset(section_offset_top: f32, nav_height: f32) -> f32 {
    section_offset_top - nav_height
}

/// Work due after a URL-fragment arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrivalAction {
    /// Scroll to the section with this id.
    ScrollTo(String),
    /// Open the survey popup.
    OpenPopup,
}

#[derive(Debug, Clone)]
enum ArrivalStep {
    Scroll(String),
    PreparePopup,
    OpenPopup,
}

/// Delayed handling of the URL fragment a page was opened with.
#[derive(Debug, Default)]
pub struct HashArrival {
    timers: TimerManager,
    steps: HashMap<TimerId, ArrivalStep>,
}

impl HashArrival {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule handling of `hash` (including its `#`) at `now`.
    ///
    /// `target_exists` reports whether the document has an element with the
    /// fragment's id; `#contact` does not need one. Returns `true` if anything
    /// was scheduled.
    pub fn arrive(&mut self, hash: &str, now: Instant, target_exists: bool) -> bool {
        let Some(section) = hash.strip_prefix('#').filter(|id| !id.is_empty()) else {
            return false;
        };

        let step = if hash == CONTACT_HASH {
            ArrivalStep::PreparePopup
        } else if target_exists {
            ArrivalStep::Scroll(section.to_owned())
        } else {
            tracing::debug!(target: "folio::navigation", %hash, "no element for fragment");
            return false;
        };

        let id = self.timers.start_one_shot(now, ARRIVAL_DELAY);
        self.steps.insert(id, step);
        true
    }

    /// Run every step due at `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<ArrivalAction> {
        let mut actions = Vec::new();
        for id in self.timers.process_expired(now) {
            match self.steps.remove(&id) {
                Some(ArrivalStep::Scroll(section)) => actions.push(ArrivalAction::ScrollTo(section)),
                Some(ArrivalStep::PreparePopup) => {
                    let next = self.timers.start_one_shot(now, POPUP_SETTLE_DELAY);
                    self.steps.insert(next, ArrivalStep::OpenPopup);
                }
                Some(ArrivalStep::OpenPopup) => actions.push(ArrivalAction::OpenPopup),
                None => {}
            }
        }
        actions
    }

    /// Time until the next step is due.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.timers.time_until_next(now)
    }

    /// Whether no step is outstanding.
    pub fn is_idle(&self) -> bool {
        self.steps.is_empty()
    }
}
