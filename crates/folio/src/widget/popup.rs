//! The consultation survey popup.
//!
//! A modal overlay that traps keyboard focus while open and hands focus back
//! to whatever opened it when it closes. Opening is requested by trigger
//! elements (anything tagged `data-popup-trigger="survey"` plus every
//! `#contact` link), by a same-page `#contact` anchor, or by arriving at the
//! page with a `#contact` fragment.

use folio_core::Signal;

use crate::widget::DefaultAction;

/// Element id focus falls back to when the opener had none.
pub const DEFAULT_FOCUS_RETURN: &str = "survey-trigger";

/// Attribute marking popup trigger elements.
pub const TRIGGER_ATTRIBUTE: &str = "data-popup-trigger";

/// Value of [`TRIGGER_ATTRIBUTE`] for the survey popup.
pub const TRIGGER_VALUE: &str = "survey";

/// Minimum downward travel, in pixels, for a swipe to close the popup.
pub const SWIPE_CLOSE_DISTANCE: f32 = 50.0;

/// Widest viewport on which swipe-to-close is honoured.
pub const SWIPE_MAX_VIEWPORT_WIDTH: f32 = 768.0;

/// An element that can receive focus when the popup closes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    /// The element with this id.
    ElementId(String),
    /// The first `[data-popup-trigger="survey"]` element.
    FirstTrigger,
    /// The first `a[href="#contact"]` link.
    ContactLink,
}

/// The popup as rendered.
pub trait PopupSurface {
    /// Show or hide the overlay.
    fn set_active(&mut self, active: bool);

    /// Lock or unlock scrolling of the page behind the overlay.
    fn set_scroll_locked(&mut self, locked: bool);

    /// Focus the popup's container.
    fn focus_container(&mut self);

    /// Id of the currently focused element, if it has one.
    fn focused_element_id(&self) -> Option<String>;

    /// Move focus to `target`. Returns `false` if no such element exists.
    fn focus(&mut self, target: &FocusTarget) -> bool;
}

/// Keys the popup reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupKey {
    Escape,
    Tab { shift: bool },
    Other,
}

/// Focus state inside the popup at the time of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRing {
    /// Number of focusable elements inside the popup.
    pub len: usize,
    /// Index of the focused one, if focus is inside the popup.
    pub focused: Option<usize>,
}

/// How the popup handled a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResponse {
    /// Not for the popup.
    Ignored,
    /// The popup closed.
    Closed,
    /// Focus wrapped; the host must focus this index and suppress the default.
    MoveFocus(usize),
}

impl KeyResponse {
    pub fn default_action(self) -> DefaultAction {
        match self {
            KeyResponse::MoveFocus(_) => DefaultAction::Prevent,
            _ => DefaultAction::Allow,
        }
    }
}

/// Where a click landed relative to the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed overlay itself.
    Overlay,
    /// Inside the popup container.
    Container,
    /// Anywhere else.
    Outside,
}

/// A candidate trigger element found in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerCandidate<'a> {
    /// Value of [`TRIGGER_ATTRIBUTE`], if present.
    pub trigger_attribute: Option<&'a str>,
    /// `href` of the element, if any.
    pub href: Option<&'a str>,
}

/// How a trigger element should be wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerBinding {
    /// The element lacks [`TRIGGER_ATTRIBUTE`] and should be tagged with it.
    pub needs_tag: bool,
}

/// Whether `candidate` opens the popup, and how to wire it.
pub fn bind_trigger(candidate: TriggerCandidate<'_>) -> Option<TriggerBinding> {
    let tagged = candidate.trigger_attribute == Some(TRIGGER_VALUE);
    let contact_link = candidate.href == Some("#contact");
    if !tagged && !contact_link {
        return None;
    }
    Some(TriggerBinding {
        needs_tag: candidate.trigger_attribute.is_none(),
    })
}

#[derive(Debug, Default, Clone, Copy)]
struct SwipeTracker {
    start_y: f32,
    current_y: f32,
}

/// The survey popup.
pub struct SurveyPopup {
    surface: Box<dyn PopupSurface>,
    active: bool,
    focus_return: Option<String>,
    swipe: SwipeTracker,
    opened: Signal<()>,
    closed: Signal<()>,
}

impl SurveyPopup {
    pub fn new(surface: impl PopupSurface + 'static) -> Self {
        Self {
            surface: Box::new(surface),
            active: false,
            focus_return: None,
            swipe: SwipeTracker::default(),
            opened: Signal::new(),
            closed: Signal::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Id focus will return to on close.
    pub fn focus_return(&self) -> Option<&str> {
        self.focus_return.as_deref()
    }

    pub fn opened(&self) -> &Signal<()> {
        &self.opened
    }

    pub fn closed(&self) -> &Signal<()> {
        &self.closed
    }

    /// Show the popup and move focus into it.
    ///
    /// The element focused beforehand is remembered for [`close`](Self::close).
    pub fn open(&mut self) {
        if !self.active {
            let opener = self
                .surface
                .focused_element_id()
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| DEFAULT_FOCUS_RETURN.to_owned());
            self.focus_return = Some(opener);
        }

        self.active = true;
        self.surface.set_active(true);
        self.surface.set_scroll_locked(true);
        self.surface.focus_container();
        tracing::debug!(target: "folio::popup", focus_return = ?self.focus_return, "popup opened");
        self.opened.emit(());
    }

    /// Hide the popup and return focus.
    ///
    /// Focus goes to the remembered element, else the first trigger, else the
    /// first contact link. Closing an inactive popup does nothing.
    pub fn close(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.surface.set_active(false);
        self.surface.set_scroll_locked(false);

        let remembered = self
            .focus_return
            .take()
            .unwrap_or_else(|| DEFAULT_FOCUS_RETURN.to_owned());
        let chain = [
            FocusTarget::ElementId(remembered),
            FocusTarget::FirstTrigger,
            FocusTarget::ContactLink,
        ];
        let returned = chain.iter().find(|target| self.surface.focus(target));
        tracing::debug!(target: "folio::popup", ?returned, "popup closed");
        self.closed.emit(());
    }

    /// A trigger element was activated.
    pub fn on_trigger_activated(&mut self) -> DefaultAction {
        self.open();
        DefaultAction::Prevent
    }

    /// A key was pressed anywhere in the document.
    pub fn on_key(&mut self, key: PopupKey, focus: FocusRing) -> KeyResponse {
        if !self.active {
            return KeyResponse::Ignored;
        }
        match key {
            PopupKey::Escape => {
                self.close();
                KeyResponse::Closed
            }
            PopupKey::Tab { shift } => {
                if focus.len == 0 {
                    return KeyResponse::Ignored;
                }
                let last = focus.len - 1;
                match (shift, focus.focused) {
                    (true, Some(0)) => KeyResponse::MoveFocus(last),
                    (false, Some(index)) if index == last => KeyResponse::MoveFocus(0),
                    _ => KeyResponse::Ignored,
                }
            }
            PopupKey::Other => KeyResponse::Ignored,
        }
    }

    /// A click landed at `target`. Clicking the bare overlay closes.
    pub fn on_click(&mut self, target: ClickTarget) {
        if self.active && target == ClickTarget::Overlay {
            self.close();
        }
    }

    pub fn on_touch_start(&mut self, y: f32) {
        self.swipe = SwipeTracker {
            start_y: y,
            current_y: y,
        };
    }

    pub fn on_touch_move(&mut self, y: f32) {
        self.swipe.current_y = y;
    }

    /// A touch gesture ended. A long enough downward swipe closes the popup
    /// on narrow viewports.
    pub fn on_touch_end(&mut self, viewport_width: f32) {
        if !self.active {
            return;
        }
        let travel = self.swipe.current_y - self.swipe.start_y;
        if travel > SWIPE_CLOSE_DISTANCE && viewport_width <= SWIPE_MAX_VIEWPORT_WIDTH {
            self.close();
        }
    }
}

impl std::fmt::Debug for SurveyPopup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurveyPopup")
            .field("active", &self.active)
            .field("focus_return", &self.focus_return)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_trigger() {
        assert_eq!(
            bind_trigger(TriggerCandidate {
                trigger_attribute: Some("survey"),
                href: None
            }),
            Some(TriggerBinding { needs_tag: false })
        );
        assert_eq!(
            bind_trigger(TriggerCandidate {
                trigger_attribute: None,
                href: Some("#contact")
            }),
            Some(TriggerBinding { needs_tag: true })
        );
        assert_eq!(
            bind_trigger(TriggerCandidate {
                trigger_attribute: None,
                href: Some("#process")
            }),
            None
        );
        assert_eq!(
            bind_trigger(TriggerCandidate {
                trigger_attribute: Some("newsletter"),
                href: None
            }),
            None
        );
    }

    #[test]
    fn test_key_response_default_action() {
        assert!(KeyResponse::MoveFocus(0).default_action().is_prevented());
        assert!(!KeyResponse::Closed.default_action().is_prevented());
        assert!(!KeyResponse::Ignored.default_action().is_prevented());
    }
}
