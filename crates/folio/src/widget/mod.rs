//! Headless site widgets.
//!
//! Each widget is a state machine that a host drives with events and that
//! talks back through small collaborator traits. None of them touch a
//! document directly.

pub mod gallery;
pub mod navigation;
pub mod parallax;
pub mod popup;

/// What the host should do with the platform's default handling of an event
/// (following a link, moving focus).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultAction {
    /// Let the default behavior run.
    #[default]
    Allow,
    /// Suppress the default behavior.
    Prevent,
}

impl DefaultAction {
    pub fn is_prevented(self) -> bool {
        self == DefaultAction::Prevent
    }
}
