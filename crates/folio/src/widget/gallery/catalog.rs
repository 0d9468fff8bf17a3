//! Image catalog, shuffled presentation order and the pagination cursor.

use std::ops::Range;

use rand::Rng;

/// The fixed set of image references a gallery can show.
///
/// The catalog is never mutated once handed to a gallery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceCatalog {
    sources: Vec<String>,
}

impl SourceCatalog {
    /// Create a catalog from image references, keeping their order.
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Produce a uniformly random permutation of the catalog.
    ///
    /// Uses the Fisher–Yates shuffle: walking down from the last slot, each
    /// slot swaps with a uniformly chosen slot at or below it, so every one of
    /// the `N!` orderings is equally likely.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> PresentationOrder {
        let mut entries = self.sources.clone();
        for i in (1..entries.len()).rev() {
            let j = rng.gen_range(0..=i);
            entries.swap(i, j);
        }
        PresentationOrder { entries }
    }
}

impl<S: Into<String>> FromIterator<S> for SourceCatalog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// The order in which catalog entries are presented. Fixed once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationOrder {
    entries: Vec<String>,
}

impl PresentationOrder {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        self.entries.get(position).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }
}

/// A presentation order plus how much of it has been appended.
#[derive(Debug, Clone)]
pub(crate) struct Pagination {
    order: PresentationOrder,
    cursor: usize,
}

impl Pagination {
    pub(crate) fn new(order: PresentationOrder) -> Self {
        Self { order, cursor: 0 }
    }

    pub(crate) fn order(&self) -> &PresentationOrder {
        &self.order
    }

    /// Number of entries appended so far. Never exceeds the order length.
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn total(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn has_more(&self) -> bool {
        self.cursor < self.order.len()
    }

    /// Positions of the next batch of at most `size` entries.
    pub(crate) fn next_range(&self, size: usize) -> Range<usize> {
        let end = self.cursor.saturating_add(size).min(self.order.len());
        self.cursor..end
    }

    /// Mark every entry before `end` as appended.
    pub(crate) fn advance_to(&mut self, end: usize) {
        debug_assert!(end >= self.cursor);
        self.cursor = end.clamp(self.cursor, self.order.len());
    }
}
