use std::path::Path;
use std::sync::Arc;

use braindrop_core::{LocalStore, Raindrop, RaindropId};
use serde::Serialize;

use crate::commands::common::{format_timestamp, open_store, print_json};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct RaindropDetails<'a> {
    #[serde(flatten)]
    raindrop: &'a Raindrop,
    collection_title: String,
}

pub async fn run_show(id: &str, as_json: bool, data_file: &Path) -> Result<(), CliError> {
    let store = open_store(data_file).await?;
    let raindrop = find_raindrop(&store, id)?;
    let collection_title = store.collection(raindrop.collection).title;

    if as_json {
        return print_json(&RaindropDetails {
            raindrop: &raindrop,
            collection_title,
        });
    }

    for line in format_details(&raindrop, &collection_title) {
        println!("{line}");
    }
    Ok(())
}

pub fn find_raindrop<A>(store: &LocalStore<A>, id: &str) -> Result<Arc<Raindrop>, CliError> {
    let id = id.trim();
    let parsed = id
        .parse::<RaindropId>()
        .map_err(|_| CliError::InvalidRaindropId(id.to_string()))?;
    store
        .raindrop(parsed)
        .ok_or_else(|| CliError::RaindropNotFound(id.to_string()))
}

pub fn format_details(raindrop: &Raindrop, collection_title: &str) -> Vec<String> {
    let mut lines = vec![
        format!("Title:      {}", raindrop.title),
        format!("Link:       {}", raindrop.link),
    ];
    if !raindrop.domain.is_empty() {
        lines.push(format!("Domain:     {}", raindrop.domain));
    }
    lines.push(format!(
        "Collection: {collection_title} ({})",
        raindrop.collection
    ));
    lines.push(format!("Type:       {}", raindrop.kind.as_str()));
    if !raindrop.tags.is_empty() {
        let tags = raindrop
            .tags
            .iter()
            .map(|tag| tag.name())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Tags:       {tags}"));
    }
    lines.push(format!("Created:    {}", format_timestamp(raindrop.created)));
    lines.push(format!(
        "Updated:    {}",
        format_timestamp(raindrop.last_update)
    ));
    if raindrop.important {
        lines.push("Favourite:  yes".to_string());
    }
    if raindrop.broken {
        lines.push("Broken:     yes".to_string());
    }
    if !raindrop.excerpt.is_empty() {
        lines.push(String::new());
        lines.push(raindrop.excerpt.clone());
    }
    if !raindrop.note.is_empty() {
        lines.push(String::new());
        lines.push(format!("Note: {}", raindrop.note));
    }
    lines
}
