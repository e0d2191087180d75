//! Filtered views over the local raindrops.
//!
//! A [`RaindropView`] is an immutable, cheaply cloned list of raindrops plus
//! the filters that produced it. Collection views are the roots of a filter
//! chain; tag and text filters narrow a view while remembering that root, so
//! [`RaindropView::unfiltered`] can return to it without recomputing
//! anything. Filtering never reorders: a view is always in the order of the
//! list it was derived from, which is the order of the local snapshot.

mod tags;

use std::sync::Arc;

use crate::models::{Collection, Raindrop, RaindropId, SpecialCollection, Tag};

pub use tags::{TagCount, TagOrder};

/// A narrowing applied on top of a collection view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewFilter {
    /// Only raindrops carrying the tag
    Tagged(Tag),
    /// Only raindrops containing the (lowercased) text
    Containing(String),
}

/// An ordered, read-only selection of raindrops
#[derive(Debug, Clone)]
pub struct RaindropView {
    title: String,
    filters: Vec<ViewFilter>,
    items: Arc<[Arc<Raindrop>]>,
    base: Option<Arc<RaindropView>>,
}

impl RaindropView {
    /// An unfiltered view with the given title
    pub fn new(title: impl Into<String>, items: impl IntoIterator<Item = Arc<Raindrop>>) -> Self {
        Self {
            title: title.into(),
            filters: Vec::new(),
            items: items.into_iter().collect(),
            base: None,
        }
    }

    /// A view with nothing in it
    pub fn empty(title: impl Into<String>) -> Self {
        Self::new(title, std::iter::empty())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn filters(&self) -> &[ViewFilter] {
        &self.filters
    }

    /// Is any tag or text filter narrowing this view?
    pub fn is_filtered(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Title plus a summary of the active filters, e.g.
    /// `Reading; tagged rust, async; containing "tokio"`.
    pub fn description(&self) -> String {
        let tags = self
            .filters
            .iter()
            .filter_map(|filter| match filter {
                ViewFilter::Tagged(tag) => Some(tag.name()),
                ViewFilter::Containing(_) => None,
            })
            .collect::<Vec<_>>();
        let texts = self
            .filters
            .iter()
            .filter_map(|filter| match filter {
                ViewFilter::Containing(text) => Some(format!("\"{text}\"")),
                ViewFilter::Tagged(_) => None,
            })
            .collect::<Vec<_>>();

        let mut description = self.title.clone();
        if !tags.is_empty() {
            description.push_str(&format!("; tagged {}", tags.join(", ")));
        }
        if !texts.is_empty() {
            description.push_str(&format!("; containing {}", texts.join(" and ")));
        }
        description
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Raindrop>> {
        self.items.iter()
    }

    pub fn raindrops(&self) -> &[Arc<Raindrop>] {
        &self.items
    }

    /// Identities in view order
    pub fn ids(&self) -> Vec<RaindropId> {
        self.items.iter().map(|raindrop| raindrop.id).collect()
    }

    pub fn get(&self, id: RaindropId) -> Option<&Arc<Raindrop>> {
        self.items.iter().find(|raindrop| raindrop.id == id)
    }

    /// Narrow to raindrops carrying `tag`.
    #[must_use]
    pub fn tagged(&self, tag: &Tag) -> Self {
        by_tag(self, tag)
    }

    /// Narrow to raindrops containing `text`.
    #[must_use]
    pub fn containing(&self, text: &str) -> Self {
        search(self, text)
    }

    /// The collection view this view was narrowed from.
    #[must_use]
    pub fn unfiltered(&self) -> Self {
        unfiltered(self)
    }

    fn narrowed(&self, filter: ViewFilter, keep: impl Fn(&Raindrop) -> bool) -> Self {
        if self.filters.contains(&filter) {
            return self.clone();
        }

        let base = self
            .base
            .clone()
            .unwrap_or_else(|| Arc::new(self.clone()));
        let mut filters = self.filters.clone();
        filters.push(filter);

        Self {
            title: self.title.clone(),
            filters,
            items: self
                .items
                .iter()
                .filter(|raindrop| keep(raindrop))
                .cloned()
                .collect(),
            base: Some(base),
        }
    }
}

impl PartialEq for RaindropView {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.filters == other.filters
            && self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(other.items.iter())
                .all(|(left, right)| left.id == right.id)
    }
}

impl Eq for RaindropView {}

impl<'a> IntoIterator for &'a RaindropView {
    type Item = &'a Arc<Raindrop>;
    type IntoIter = std::slice::Iter<'a, Arc<Raindrop>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Does `raindrop` belong in `collection`?
///
/// Server collections match on identity; the special collections apply
/// their own rule. Trash is always empty because raindrops carry no
/// deletion flag.
pub fn in_collection(raindrop: &Raindrop, collection: &Collection) -> bool {
    match collection.id.special() {
        Some(SpecialCollection::All) => true,
        Some(SpecialCollection::Unsorted) => raindrop.is_unsorted(),
        Some(SpecialCollection::Untagged) => raindrop.tags.is_empty(),
        Some(SpecialCollection::Broken) => raindrop.broken,
        Some(SpecialCollection::Trash) => false,
        None => raindrop.collection == collection.id,
    }
}

/// Start a new chain: the raindrops of `source` that belong in `collection`.
pub fn by_collection(source: &RaindropView, collection: &Collection) -> RaindropView {
    RaindropView::new(
        collection.title.clone(),
        source
            .iter()
            .filter(|raindrop| in_collection(raindrop, collection))
            .cloned(),
    )
}

/// The raindrops of `source` tagged with `tag`, ignoring case.
pub fn by_tag(source: &RaindropView, tag: &Tag) -> RaindropView {
    source.narrowed(ViewFilter::Tagged(tag.clone()), |raindrop| {
        raindrop.has_tag(tag)
    })
}

/// The raindrops of `source` whose title, excerpt, note or link contain
/// `text`, ignoring case. Empty text leaves `source` as it is.
pub fn search(source: &RaindropView, text: &str) -> RaindropView {
    if text.is_empty() {
        return source.clone();
    }
    let needle = text.to_lowercase();
    source.narrowed(ViewFilter::Containing(needle.clone()), |raindrop| {
        raindrop.contains_folded(&needle)
    })
}

/// Drop every tag and text filter, returning to the collection view.
pub fn unfiltered(view: &RaindropView) -> RaindropView {
    view.base
        .as_deref()
        .cloned()
        .unwrap_or_else(|| view.clone())
}
