//! Raindrop (bookmark) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use super::{CollectionId, SpecialCollection, Tag};

/// The numeric identity of a raindrop
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RaindropId(i64);

impl RaindropId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RaindropId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RaindropId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// The kind of content a raindrop points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaindropType {
    #[default]
    Link,
    Article,
    Image,
    Video,
    Document,
    Audio,
}

impl RaindropType {
    /// Parse the API's type string; anything unrecognised is a plain link.
    pub fn from_api(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "article" => Self::Article,
            "image" => Self::Image,
            "video" => Self::Video,
            "document" => Self::Document,
            "audio" => Self::Audio,
            _ => Self::Link,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Article => "article",
            Self::Image => "image",
            Self::Video => "video",
            Self::Document => "document",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for RaindropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single bookmark
///
/// Raindrops are immutable once built from server data. Two raindrops are
/// equal when they share an identity, whatever their other fields say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Raindrop {
    /// Unique identifier
    pub id: RaindropId,
    /// Title of the bookmark
    #[serde(default)]
    pub title: String,
    /// The bookmarked URL
    #[serde(default)]
    pub link: String,
    /// Description of the page
    #[serde(default)]
    pub excerpt: String,
    /// The user's own note
    #[serde(default)]
    pub note: String,
    /// Domain of the link
    #[serde(default)]
    pub domain: String,
    /// When the raindrop was created
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// When the raindrop was last updated
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
    /// Owning collection
    pub collection: CollectionId,
    /// Tags, case-insensitively unique
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
    /// Is the link known to be broken?
    #[serde(default)]
    pub broken: bool,
    /// Marked as a favourite
    #[serde(default)]
    pub important: bool,
    /// Kind of content
    #[serde(default, rename = "type")]
    pub kind: RaindropType,
    /// Cover image URL
    #[serde(default)]
    pub cover: Option<String>,
}

impl Raindrop {
    /// Create a raindrop with the given identity in the given collection
    #[must_use]
    pub fn new(id: RaindropId, collection: CollectionId) -> Self {
        Self {
            id,
            title: String::new(),
            link: String::new(),
            excerpt: String::new(),
            note: String::new(),
            domain: String::new(),
            created: None,
            last_update: None,
            collection,
            tags: BTreeSet::new(),
            broken: false,
            important: false,
            kind: RaindropType::Link,
            cover: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    #[must_use]
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Tag>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_broken(mut self, broken: bool) -> Self {
        self.broken = broken;
        self
    }

    /// Has this raindrop not been filed into a collection?
    pub fn is_unsorted(&self) -> bool {
        self.collection == SpecialCollection::Unsorted.id()
    }

    /// Does the raindrop carry the given tag (case-insensitive)?
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    /// Does the raindrop contain the already lowercased needle?
    ///
    /// Title, excerpt, note and link are searched; a hit in any one counts.
    pub fn contains_folded(&self, needle: &str) -> bool {
        [&self.title, &self.excerpt, &self.note, &self.link]
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle))
    }

    /// Case-insensitive substring match; see [`Raindrop::contains_folded`].
    pub fn contains(&self, text: &str) -> bool {
        self.contains_folded(&text.to_lowercase())
    }
}

impl PartialEq for Raindrop {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Raindrop {}

impl Hash for Raindrop {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
