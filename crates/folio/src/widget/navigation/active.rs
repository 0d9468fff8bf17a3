//! Scroll-position driven link highlighting.

use std::time::Duration;

use super::NavLink;

/// Sections start counting as "in view" this many pixels before their top
/// reaches the bottom of the fixed navigation bar.
pub const HIGHLIGHT_OFFSET: f32 = 100.0;

/// Minimum spacing between highlight updates.
pub const HIGHLIGHT_THROTTLE: Duration = Duration::from_millis(100);

/// Layout box of a page section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionBox {
    /// Distance from the document top.
    pub offset_top: f32,
    pub height: f32,
}

/// Read-only page geometry.
pub trait SectionGeometry {
    /// Height of the fixed navigation bar.
    fn nav_height(&self) -> f32;

    /// Current vertical scroll offset.
    fn scroll_y(&self) -> f32;

    /// Box of the element with `id`, if it exists.
    fn section(&self, id: &str) -> Option<SectionBox>;
}

/// Which of `links` should be highlighted for the current scroll position.
pub fn active_link<G: SectionGeometry + ?Sized>(links: &[NavLink], geometry: &G) -> Option<usize> {
    let nav_height = geometry.nav_height();
    let position = geometry.scroll_y() + nav_height;

    // Near the top only a plain page link can be current.
    if position < nav_height + HIGHLIGHT_OFFSET {
        return links.first().filter(|link| !link.is_anchor()).map(|_| 0);
    }

    let matched = links.iter().enumerate().find_map(|(index, link)| {
        let section = geometry.section(link.section_id()?)?;
        let top = section.offset_top - nav_height - HIGHLIGHT_OFFSET;
        (position >= top && position < top + section.height).then_some(index)
    });

    matched.or_else(|| (!links.is_empty()).then_some(0))
}
