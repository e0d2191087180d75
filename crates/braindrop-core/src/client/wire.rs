//! JSON shapes returned by the raindrop.io REST API.

use serde::Deserialize;

use crate::error::ApiError;
use crate::models::{Collection, CollectionId, Raindrop, RaindropId, RaindropType, Tag, User};
use crate::util::{normalize_text_option, parse_timestamp};

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    #[serde(default)]
    result: bool,
    user: Option<WireUser>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemsEnvelope<T> {
    #[serde(default)]
    result: bool,
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct IdRef {
    #[serde(rename = "$id")]
    id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUser {
    #[serde(rename = "_id")]
    id: i64,
    #[serde(default)]
    full_name: String,
    email: Option<String>,
    #[serde(default)]
    pro: bool,
    last_action: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireCollection {
    #[serde(rename = "_id")]
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    count: u64,
    #[serde(default)]
    cover: Vec<String>,
    created: Option<String>,
    last_update: Option<String>,
    #[serde(default)]
    public: bool,
    #[serde(default)]
    sort: i64,
    #[serde(default)]
    expanded: bool,
    #[serde(default)]
    view: Option<String>,
    parent: Option<IdRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireRaindrop {
    #[serde(rename = "_id")]
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    note: String,
    #[serde(default)]
    domain: String,
    created: Option<String>,
    last_update: Option<String>,
    collection: Option<IdRef>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    broken: bool,
    #[serde(default)]
    important: bool,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    cover: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error_message: Option<String>,
    error: Option<String>,
    message: Option<String>,
}

impl UserEnvelope {
    pub(crate) fn into_user(self) -> Result<User, ApiError> {
        match (self.result, self.user) {
            (true, Some(user)) => Ok(user.into()),
            _ => Err(ApiError::new("Raindrop did not return any user details")),
        }
    }
}

impl<T> ItemsEnvelope<T> {
    pub(crate) fn into_items(self) -> Result<(Vec<T>, Option<u64>), ApiError> {
        if self.result {
            Ok((self.items, self.count))
        } else {
            Err(ApiError::new("Raindrop reported a failed request"))
        }
    }
}

impl From<WireUser> for User {
    fn from(value: WireUser) -> Self {
        Self {
            id: value.id,
            full_name: value.full_name,
            email: normalize_text_option(value.email),
            pro: value.pro,
            last_action: parse_timestamp(value.last_action.as_deref()),
        }
    }
}

impl From<WireCollection> for Collection {
    fn from(value: WireCollection) -> Self {
        Self {
            id: CollectionId::new(value.id),
            title: value.title,
            color: value.color.unwrap_or_default(),
            count: value.count,
            cover: value.cover,
            created: parse_timestamp(value.created.as_deref()),
            last_update: parse_timestamp(value.last_update.as_deref()),
            public: value.public,
            sort: value.sort,
            expanded: value.expanded,
            view: value.view.unwrap_or_default(),
            parent: value.parent.map(|parent| CollectionId::new(parent.id)),
        }
    }
}

impl From<WireRaindrop> for Raindrop {
    fn from(value: WireRaindrop) -> Self {
        // Raindrop files items without a collection reference under Unsorted.
        let collection = value
            .collection
            .map_or(crate::models::SpecialCollection::Unsorted.id(), |reference| {
                CollectionId::new(reference.id)
            });

        Self {
            id: RaindropId::new(value.id),
            title: value.title,
            link: value.link,
            excerpt: value.excerpt,
            note: value.note,
            domain: value.domain,
            created: parse_timestamp(value.created.as_deref()),
            last_update: parse_timestamp(value.last_update.as_deref()),
            collection,
            tags: value
                .tags
                .into_iter()
                .filter(|tag| !tag.trim().is_empty())
                .map(Tag::new)
                .collect(),
            broken: value.broken,
            important: value.important,
            kind: value
                .kind
                .as_deref()
                .map_or(RaindropType::Link, RaindropType::from_api),
            cover: normalize_text_option(value.cover),
        }
    }
}

/// Pull the most useful message out of an API error body.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = payload
            .error_message
            .or(payload.message)
            .or(payload.error)
            .and_then(|message| normalize_text_option(Some(message)))
        {
            return format!("{message} ({status})");
        }
    }

    let trimmed = crate::util::compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("{trimmed} ({status})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn user_envelope_parses_last_action() {
        let payload = r#"{
            "result": true,
            "user": {
                "_id": 42,
                "fullName": "Ada Lovelace",
                "email": "ada@example.com",
                "pro": true,
                "lastAction": "2024-05-01T08:00:00.000Z"
            }
        }"#;
        let user = serde_json::from_str::<UserEnvelope>(payload)
            .unwrap()
            .into_user()
            .unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.full_name, "Ada Lovelace");
        assert!(user.pro);
        assert_eq!(
            user.last_action.map(|time| time.to_rfc3339()),
            Some("2024-05-01T08:00:00+00:00".to_string())
        );
    }

    #[test]
    fn user_envelope_without_result_is_an_error() {
        let envelope: UserEnvelope = serde_json::from_str(r#"{"result": false}"#).unwrap();
        assert!(envelope.into_user().is_err());
    }

    #[test]
    fn collection_maps_parent_reference() {
        let payload = r##"{
            "_id": 12,
            "title": "Rust",
            "color": "#ff0000",
            "count": 3,
            "cover": ["https://example.com/c.png"],
            "created": "2023-01-01T00:00:00Z",
            "lastUpdate": "not a date",
            "public": true,
            "sort": 4,
            "expanded": false,
            "view": "list",
            "parent": {"$id": 7}
        }"##;
        let collection: Collection = serde_json::from_str::<WireCollection>(payload)
            .unwrap()
            .into();
        assert_eq!(collection.id, CollectionId::new(12));
        assert_eq!(collection.parent, Some(CollectionId::new(7)));
        assert_eq!(collection.count, 3);
        assert!(collection.created.is_some());
        assert_eq!(collection.last_update, None);
    }

    #[test]
    fn raindrop_maps_collection_and_tags() {
        let payload = r#"{
            "_id": 99,
            "title": "Tokio tutorial",
            "link": "https://tokio.rs/tokio/tutorial",
            "excerpt": "Learn async Rust",
            "collection": {"$id": -1},
            "tags": ["Rust", "async", " "],
            "broken": true,
            "type": "article",
            "cover": ""
        }"#;
        let raindrop: Raindrop = serde_json::from_str::<WireRaindrop>(payload)
            .unwrap()
            .into();
        assert_eq!(raindrop.id, RaindropId::new(99));
        assert!(raindrop.is_unsorted());
        assert_eq!(raindrop.tags.len(), 2);
        assert!(raindrop.has_tag(&Tag::new("rust")));
        assert!(raindrop.broken);
        assert_eq!(raindrop.kind, RaindropType::Article);
        assert_eq!(raindrop.cover, None);
    }

    #[test]
    fn error_message_prefers_api_message() {
        assert_eq!(
            error_message(401, r#"{"result":false,"errorMessage":"Invalid token"}"#),
            "Invalid token (401)"
        );
        assert_eq!(error_message(502, ""), "HTTP 502");
        assert_eq!(error_message(500, "upstream down"), "upstream down (500)");
    }
}
