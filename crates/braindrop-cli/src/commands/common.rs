use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use braindrop_core::{
    AppPaths, Collection, CollectionId, LocalStore, Raindrop, RaindropClient, SpecialCollection,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::CliError;
use crate::settings::CliSettings;

pub const TOKEN_ENV_VAR: &str = "BRAINDROP_API_TOKEN";
pub const DATA_PATH_ENV_VAR: &str = "BRAINDROP_DATA_PATH";

#[derive(Debug, Serialize)]
pub struct RaindropListItem {
    pub id: i64,
    pub title: String,
    pub link: String,
    pub domain: String,
    pub collection_id: i64,
    pub collection: String,
    pub tags: Vec<String>,
    pub created: Option<DateTime<Utc>>,
    pub broken: bool,
}

pub fn resolve_paths(cli_data_path: Option<PathBuf>) -> Result<AppPaths, CliError> {
    let paths = AppPaths::resolve()?;
    Ok(
        match cli_data_path.or_else(|| env::var_os(DATA_PATH_ENV_VAR).map(PathBuf::from)) {
            Some(data_file) => paths.with_data_file(data_file),
            None => paths,
        },
    )
}

/// Token from the command line, then the environment, then the token file.
pub fn resolve_token(
    cli_token: Option<&str>,
    token_file: &Path,
) -> Result<Option<String>, CliError> {
    if let Some(token) = normalize_token(cli_token) {
        return Ok(Some(token));
    }
    if let Some(token) = normalize_token(env::var(TOKEN_ENV_VAR).ok().as_deref()) {
        return Ok(Some(token));
    }
    read_token_file(token_file)
}

pub fn read_token_file(path: &Path) -> Result<Option<String>, CliError> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Ok(normalize_token(Some(&raw))),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(CliError::Io(error)),
    }
}

pub fn normalize_token(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// A store backed by the real API, for commands that talk to the server.
pub async fn open_online_store(
    paths: &AppPaths,
    cli_token: Option<&str>,
    settings: &CliSettings,
) -> Result<LocalStore<RaindropClient>, CliError> {
    let token = resolve_token(cli_token, paths.token_file())?.ok_or(CliError::NotLoggedIn)?;
    let client = RaindropClient::new(token, &settings.client_config())?;
    let store = LocalStore::new(paths.data_file(), client);
    load_store(&store).await?;
    Ok(store)
}

/// A store that only reads local data.
pub async fn open_store(data_file: &Path) -> Result<LocalStore, CliError> {
    let store = LocalStore::offline(data_file);
    load_store(&store).await?;
    Ok(store)
}

/// Load local data, carrying on empty when the file was unreadable.
pub async fn load_store<A>(store: &LocalStore<A>) -> Result<(), CliError> {
    match store.load().await {
        Ok(()) => Ok(()),
        Err(error @ braindrop_core::Error::CorruptSnapshot { .. }) => {
            tracing::warn!("{error}; starting with empty local data");
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}

/// Find a collection by ID, special name, or title (ignoring case).
pub fn resolve_collection<A>(store: &LocalStore<A>, query: &str) -> Result<Collection, CliError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CliError::CollectionNotFound(query.to_string()));
    }

    if let Ok(id) = query.parse::<CollectionId>() {
        if id.special().is_some() || store.collections().iter().any(|c| c.id == id) {
            return Ok(store.collection(id));
        }
        return Err(CliError::CollectionNotFound(query.to_string()));
    }

    if let Some(special) = SpecialCollection::from_title(query) {
        return Ok(special.collection());
    }

    let needle = query.to_lowercase();
    let mut matches = store
        .collections()
        .into_iter()
        .filter(|collection| collection.title.to_lowercase() == needle)
        .collect::<Vec<_>>();

    match matches.len() {
        0 => Err(CliError::CollectionNotFound(query.to_string())),
        1 => Ok(matches.remove(0)),
        _ => {
            let options = matches
                .iter()
                .map(|collection| collection.id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousCollection(format!(
                "Collection name '{query}' matches several collections (IDs: {options}); use an ID"
            )))
        }
    }
}

pub fn raindrop_to_item<A>(raindrop: &Raindrop, store: &LocalStore<A>) -> RaindropListItem {
    RaindropListItem {
        id: raindrop.id.get(),
        title: raindrop.title.clone(),
        link: raindrop.link.clone(),
        domain: raindrop.domain.clone(),
        collection_id: raindrop.collection.get(),
        collection: store.collection(raindrop.collection).title,
        tags: raindrop.tags.iter().map(|tag| tag.name().to_string()).collect(),
        created: raindrop.created,
        broken: raindrop.broken,
    }
}

pub fn format_raindrop_lines(raindrops: &[Arc<Raindrop>], now: DateTime<Utc>) -> Vec<String> {
    raindrops
        .iter()
        .map(|raindrop| {
            let id = raindrop.id.to_string();
            let preview = title_preview(raindrop, 50);
            let age = raindrop
                .created
                .map_or_else(String::new, |created| format_relative_time(created, now));
            let tags = render_tags(raindrop);

            if tags.is_empty() {
                format!("{id:<10}  {preview:<50}  {age}")
            } else {
                format!("{id:<10}  {preview:<50}  {age:<10}  {tags}")
            }
        })
        .collect()
}

/// Single-line title, falling back to the link for untitled raindrops.
pub fn title_preview(raindrop: &Raindrop, max_chars: usize) -> String {
    let source = if raindrop.title.trim().is_empty() {
        raindrop.link.as_str()
    } else {
        raindrop.title.as_str()
    };
    let collapsed = source.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn render_tags(raindrop: &Raindrop) -> String {
    raindrop
        .tags
        .iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp.map_or_else(
        || "never".to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes().max(0);
    let hour = 60;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < hour {
        format!("{minutes}m ago")
    } else if minutes < day {
        format!("{}h ago", minutes / hour)
    } else if minutes < week {
        format!("{}d ago", minutes / day)
    } else if minutes < month {
        format!("{}w ago", minutes / week)
    } else if minutes < year {
        format!("{}mo ago", minutes / month)
    } else {
        format!("{}y ago", minutes / year)
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
