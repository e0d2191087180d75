//! Collection model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The numeric identity of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(i64);

impl CollectionId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// The special collection this identity is reserved for, if any
    pub fn special(self) -> Option<SpecialCollection> {
        SpecialCollection::from_id(self)
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CollectionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl From<SpecialCollection> for CollectionId {
    fn from(special: SpecialCollection) -> Self {
        special.id()
    }
}

/// A named grouping of raindrops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Unique identifier
    pub id: CollectionId,
    /// Display title
    pub title: String,
    /// Colour hint for the collection
    #[serde(default)]
    pub color: String,
    /// Number of raindrops the server reports in the collection
    #[serde(default)]
    pub count: u64,
    /// Cover image URLs
    #[serde(default)]
    pub cover: Vec<String>,
    /// When the collection was created
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// When the collection was last updated
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
    /// Is the collection visible to the public?
    #[serde(default)]
    pub public: bool,
    /// Server-side sort position
    #[serde(default)]
    pub sort: i64,
    /// Is the collection expanded in navigation?
    #[serde(default)]
    pub expanded: bool,
    /// Server view mode (list, grid, ...)
    #[serde(default)]
    pub view: String,
    /// Parent collection, absent for roots
    #[serde(default)]
    pub parent: Option<CollectionId>,
}

impl Collection {
    /// Create a bare collection with the given identity and title
    #[must_use]
    pub fn new(id: CollectionId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            color: String::new(),
            count: 0,
            cover: Vec::new(),
            created: None,
            last_update: None,
            public: false,
            sort: 0,
            expanded: false,
            view: String::new(),
            parent: None,
        }
    }

    /// Placeholder used when a raindrop refers to a collection we don't know
    #[must_use]
    pub fn unknown(id: CollectionId) -> Self {
        Self::new(id, "Unknown")
    }

    /// Set the parent collection
    #[must_use]
    pub fn with_parent(mut self, parent: CollectionId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Is this one of the locally synthesized collections?
    pub fn is_special(&self) -> bool {
        self.id.special().is_some()
    }
}

/// The built-in collections that are never fetched from the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialCollection {
    /// Every raindrop
    All,
    /// Raindrops that haven't been filed into a collection
    Unsorted,
    /// Deleted raindrops
    Trash,
    /// Raindrops without any tags
    Untagged,
    /// Raindrops whose link is broken
    Broken,
}

impl SpecialCollection {
    /// Navigation order of the special collections.
    pub const DISPLAY_ORDER: [Self; 5] = [
        Self::All,
        Self::Unsorted,
        Self::Untagged,
        Self::Broken,
        Self::Trash,
    ];

    /// The reserved identity of the special collection
    #[must_use]
    pub const fn id(self) -> CollectionId {
        CollectionId::new(match self {
            Self::All => 0,
            Self::Unsorted => -1,
            Self::Trash => -99,
            Self::Untagged => -998,
            Self::Broken => -999,
        })
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Unsorted => "Unsorted",
            Self::Trash => "Trash",
            Self::Untagged => "Untagged",
            Self::Broken => "Broken",
        }
    }

    pub fn from_id(id: CollectionId) -> Option<Self> {
        Self::DISPLAY_ORDER
            .into_iter()
            .find(|special| special.id() == id)
    }

    /// Look a special collection up by (case-insensitive) title
    pub fn from_title(title: &str) -> Option<Self> {
        let title = title.trim();
        Self::DISPLAY_ORDER
            .into_iter()
            .find(|special| special.title().eq_ignore_ascii_case(title))
    }

    /// Synthesize the collection record for this special collection
    #[must_use]
    pub fn collection(self) -> Collection {
        Collection {
            expanded: true,
            ..Collection::new(self.id(), self.title())
        }
    }
}

impl fmt::Display for SpecialCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
