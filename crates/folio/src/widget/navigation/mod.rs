//! Site navigation.
//!
//! - [`NavigationMenu`]: builds the per-page menu, owns the mobile menu's
//!   open state and highlights the link for the section in view.
//! - [`resolve_anchor`]: decides what a click on a `#` link does.
//! - [`HashArrival`]: the delayed scroll (or popup) when a page is opened
//!   with a URL fragment.

mod active;
mod anchors;

pub use active::{
    HIGHLIGHT_OFFSET, HIGHLIGHT_THROTTLE, SectionBox, SectionGeometry, active_link,
};
pub use anchors::{
    ARRIVAL_DELAY, AnchorAction, ArrivalAction, CONTACT_HASH, HashArrival, POPUP_SETTLE_DELAY,
    resolve_anchor, scroll_offset,
};

use std::time::Instant;

use folio_core::{FrameRequest, FrameScheduler, Signal, Throttle};

/// The page served for directory paths.
pub const INDEX_PAGE: &str = "index.html";

/// One entry of a navigation menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub text: &'static str,
    pub href: &'static str,
    /// The entry for the page being shown.
    pub current: bool,
}

impl NavLink {
    const fn new(text: &'static str, href: &'static str) -> Self {
        Self {
            text,
            href,
            current: false,
        }
    }

    const fn current(mut self) -> Self {
        self.current = true;
        self
    }

    /// Whether the link targets a fragment, on this page or another.
    pub fn is_anchor(&self) -> bool {
        self.href.contains('#')
    }

    /// The section id of a same-page anchor such as `#reviews`.
    pub fn section_id(&self) -> Option<&'static str> {
        self.href.strip_prefix('#').filter(|id| !id.is_empty())
    }
}

const INDEX_LINKS: [NavLink; 5] = [
    NavLink::new("PORTFOLIO", "portfolio.html"),
    NavLink::new("REVIEWS", "#reviews"),
    NavLink::new("PROCESS", "#process"),
    NavLink::new("ABOUT", "about.html"),
    NavLink::new("CONTACT", "#contact"),
];

const ABOUT_LINKS: [NavLink; 5] = [
    NavLink::new("PORTFOLIO", "portfolio.html"),
    NavLink::new("REVIEWS", "index.html#reviews"),
    NavLink::new("PROCESS", "index.html#process"),
    NavLink::new("ABOUT", "about.html").current(),
    NavLink::new("CONTACT", "index.html#contact"),
];

const PORTFOLIO_LINKS: [NavLink; 5] = [
    NavLink::new("PORTFOLIO", "portfolio.html").current(),
    NavLink::new("REVIEWS", "index.html#reviews"),
    NavLink::new("PROCESS", "index.html#process"),
    NavLink::new("ABOUT", "about.html"),
    NavLink::new("CONTACT", "index.html#contact"),
];

/// The page name for a URL path: its last segment, or [`INDEX_PAGE`] for a
/// directory path.
pub fn current_page(path: &str) -> &str {
    match path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => INDEX_PAGE,
    }
}

/// The menu for `page`. Unknown pages get the index menu.
pub fn nav_structure(page: &str) -> &'static [NavLink] {
    match page {
        "about.html" => &ABOUT_LINKS,
        "portfolio.html" => &PORTFOLIO_LINKS,
        _ => &INDEX_LINKS,
    }
}

/// The rendered menu.
pub trait MenuSurface {
    /// Remove every entry.
    fn clear(&mut self);

    fn append_link(&mut self, link: &NavLink);

    /// Open or close the menu on small screens.
    fn set_open(&mut self, open: bool);

    /// Highlight one entry, or none.
    fn set_active_link(&mut self, index: Option<usize>);
}

/// The site's navigation menu.
pub struct NavigationMenu {
    page: String,
    links: &'static [NavLink],
    surface: Box<dyn MenuSurface>,
    frames: Box<dyn FrameScheduler>,
    open: bool,
    active: Option<usize>,
    throttle: Throttle,
    highlight_frame: FrameRequest,
    active_changed: Signal<Option<usize>>,
}

impl NavigationMenu {
    /// Build the menu for the page at `path` into `surface`.
    ///
    /// Replaces whatever the surface held. The entry for the current page,
    /// if any, starts highlighted.
    pub fn generate(
        path: &str,
        mut surface: impl MenuSurface + 'static,
        frames: impl FrameScheduler + 'static,
    ) -> Self {
        let page = current_page(path).to_owned();
        let links = nav_structure(&page);

        surface.clear();
        for link in links {
            surface.append_link(link);
        }
        let active = links.iter().position(|link| link.current);
        if active.is_some() {
            surface.set_active_link(active);
        }
        tracing::debug!(target: "folio::navigation", %page, "navigation generated");

        Self {
            page,
            links,
            surface: Box::new(surface),
            frames: Box::new(frames),
            open: false,
            active,
            throttle: Throttle::new(HIGHLIGHT_THROTTLE),
            highlight_frame: FrameRequest::new(),
            active_changed: Signal::new(),
        }
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn links(&self) -> &'static [NavLink] {
        self.links
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flip the mobile menu.
    pub fn toggle(&mut self) {
        self.set_open(!self.open);
    }

    /// A click landed somewhere in the document.
    ///
    /// Clicks outside both the menu and its toggle close the menu.
    pub fn on_document_click(&mut self, inside_menu: bool, inside_toggle: bool) {
        if !inside_menu && !inside_toggle {
            self.set_open(false);
        }
    }

    fn set_open(&mut self, open: bool) {
        self.open = open;
        self.surface.set_open(open);
    }

    pub fn active_link(&self) -> Option<usize> {
        self.active
    }

    /// Emitted with the new index whenever the highlighted entry changes.
    pub fn active_changed(&self) -> &Signal<Option<usize>> {
        &self.active_changed
    }

    /// Ask for a highlight update after a scroll at `now`.
    ///
    /// At most one update per [`HIGHLIGHT_THROTTLE`] is admitted; an admitted
    /// update runs on the next animation frame. Returns `true` if a frame was
    /// requested.
    pub fn request_highlight(&mut self, now: Instant) -> bool {
        if !self.throttle.try_acquire(now) {
            return false;
        }
        self.highlight_frame.schedule(self.frames.as_mut())
    }

    /// Run the highlight update requested earlier.
    pub fn on_animation_frame<G: SectionGeometry + ?Sized>(&mut self, geometry: &G) {
        if self.highlight_frame.complete() {
            self.refresh_highlight(geometry);
        }
    }

    /// Recompute the highlighted entry from the current scroll position.
    ///
    /// Only the index page has sections to track; elsewhere the entry
    /// marked current at generation stays highlighted.
    pub fn refresh_highlight<G: SectionGeometry + ?Sized>(&mut self, geometry: &G) {
        if self.page != INDEX_PAGE {
            return;
        }
        let active = active_link(self.links, geometry);
        if active != self.active {
            tracing::trace!(target: "folio::navigation", ?active, "active link changed");
            self.active = active;
            self.surface.set_active_link(active);
            self.active_changed.emit(active);
        }
    }
}

impl std::fmt::Debug for NavigationMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationMenu")
            .field("page", &self.page)
            .field("open", &self.open)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
