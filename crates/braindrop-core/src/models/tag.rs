//! Tag model

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A tag attached to a raindrop
///
/// Tags keep the spelling they were created with for display, but compare,
/// order and hash by their lowercase form: `Rust` and `rust` are one tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Tag {
    name: String,
    folded: String,
}

impl Tag {
    /// Create a new tag with the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        let folded = name.to_lowercase();
        Self { name, folded }
    }

    /// The tag as originally spelled
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The case-folded form used for comparisons
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Does this tag match the given text, ignoring case?
    pub fn matches(&self, text: &str) -> bool {
        self.folded == text.trim().to_lowercase()
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded.hash(state);
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded.cmp(&other.folded)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.name
    }
}
