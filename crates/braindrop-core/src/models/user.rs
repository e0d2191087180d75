//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The raindrop.io account the API token belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account identifier
    pub id: i64,
    /// Display name
    pub full_name: String,
    /// Account email, when the API shares it
    pub email: Option<String>,
    /// Pro subscription flag
    pub pro: bool,
    /// When the account last changed anything on the server
    pub last_action: Option<DateTime<Utc>>,
}

impl User {
    #[must_use]
    pub fn new(id: i64, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            email: None,
            pro: false,
            last_action: None,
        }
    }

    #[must_use]
    pub fn with_last_action(mut self, last_action: DateTime<Utc>) -> Self {
        self.last_action = Some(last_action);
        self
    }
}
