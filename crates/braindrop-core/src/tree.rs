//! Collection hierarchy for navigation.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::{Collection, CollectionId, SpecialCollection};

/// A collection and its sub-collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionNode {
    pub collection: Collection,
    pub children: Vec<CollectionNode>,
}

impl CollectionNode {
    const fn leaf(collection: Collection) -> Self {
        Self {
            collection,
            children: Vec::new(),
        }
    }

    /// Depth-first walk yielding each collection with its depth.
    pub fn walk(&self) -> Vec<(usize, &Collection)> {
        let mut out = Vec::new();
        self.walk_into(0, &mut out);
        out
    }

    fn walk_into<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a Collection)>) {
        out.push((depth, &self.collection));
        for child in &self.children {
            child.walk_into(depth + 1, out);
        }
    }
}

/// Flatten a forest depth-first.
pub fn walk(forest: &[CollectionNode]) -> Vec<(usize, &Collection)> {
    forest.iter().flat_map(CollectionNode::walk).collect()
}

/// Build the navigation forest for `collections`.
///
/// The special collections come first, in [`SpecialCollection::DISPLAY_ORDER`].
/// Server collections follow, nested under their parents. A collection whose
/// parent is missing, is itself, or sits in a parent cycle becomes a root.
/// Siblings are ordered by sort position, then title, then identity.
pub fn tree(collections: &[Collection]) -> Vec<CollectionNode> {
    let known: HashMap<CollectionId, &Collection> = collections
        .iter()
        .filter(|collection| !collection.is_special())
        .map(|collection| (collection.id, collection))
        .collect();

    let mut children: HashMap<CollectionId, Vec<&Collection>> = HashMap::new();
    let mut roots: Vec<&Collection> = Vec::new();
    for collection in known.values().copied() {
        match collection.parent {
            Some(parent) if parent != collection.id && known.contains_key(&parent) => {
                children.entry(parent).or_default().push(collection);
            }
            _ => roots.push(collection),
        }
    }

    let mut placed = HashSet::new();
    let mut forest = SpecialCollection::DISPLAY_ORDER
        .into_iter()
        .map(|special| CollectionNode::leaf(special.collection()))
        .collect::<Vec<_>>();

    sort_siblings(&mut roots);
    for root in &roots {
        forest.push(build(root, &children, &mut placed));
    }

    // Whatever is left only hangs off a parent cycle; break it at the
    // lowest-sorted member so the result is stable.
    loop {
        let mut stranded = known
            .values()
            .filter(|collection| !placed.contains(&collection.id))
            .copied()
            .collect::<Vec<_>>();
        if stranded.is_empty() {
            break;
        }
        sort_siblings(&mut stranded);
        forest.push(build(stranded[0], &children, &mut placed));
    }

    forest
}

fn build(
    collection: &Collection,
    children: &HashMap<CollectionId, Vec<&Collection>>,
    placed: &mut HashSet<CollectionId>,
) -> CollectionNode {
    placed.insert(collection.id);
    let mut kids = children
        .get(&collection.id)
        .map(|kids| {
            kids.iter()
                .filter(|kid| !placed.contains(&kid.id))
                .copied()
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    sort_siblings(&mut kids);

    let mut node = CollectionNode::leaf(collection.clone());
    for kid in kids {
        if !placed.contains(&kid.id) {
            node.children.push(build(kid, children, placed));
        }
    }
    node
}

fn sort_siblings(collections: &mut [&Collection]) {
    collections.sort_by(|left, right| {
        left.sort
            .cmp(&right.sort)
            .then_with(|| left.title.to_lowercase().cmp(&right.title.to_lowercase()))
            .then_with(|| left.id.cmp(&right.id))
    });
}
