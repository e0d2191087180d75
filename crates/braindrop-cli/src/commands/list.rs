use std::path::Path;

use braindrop_core::{LocalStore, RaindropView, Tag};
use chrono::Utc;

use crate::commands::common::{
    format_raindrop_lines, open_store, print_json, raindrop_to_item, resolve_collection,
    RaindropListItem,
};
use crate::error::CliError;

#[derive(Debug, Default)]
pub struct ListQuery {
    pub collection: Option<String>,
    pub tags: Vec<String>,
    pub search: Option<String>,
}

pub async fn run_list(
    query: &ListQuery,
    limit: Option<usize>,
    as_json: bool,
    data_file: &Path,
) -> Result<(), CliError> {
    let store = open_store(data_file).await?;
    let view = select_raindrops(&store, query)?;
    let shown = &view.raindrops()[..limit.map_or(view.len(), |limit| limit.min(view.len()))];

    if as_json {
        let json_items = shown
            .iter()
            .map(|raindrop| raindrop_to_item(raindrop, &store))
            .collect::<Vec<RaindropListItem>>();
        return print_json(&json_items);
    }

    println!("{} ({})", view.description(), view.len());
    for line in format_raindrop_lines(shown, Utc::now()) {
        println!("{line}");
    }
    Ok(())
}

/// Collection first, then each tag, then the text search.
pub fn select_raindrops<A>(
    store: &LocalStore<A>,
    query: &ListQuery,
) -> Result<RaindropView, CliError> {
    let mut view = match &query.collection {
        Some(collection) => {
            let collection = resolve_collection(store, collection)?;
            store.in_collection(collection.id)
        }
        None => store.all(),
    };

    for tag in &query.tags {
        let tag = Tag::new(tag);
        if !tag.name().is_empty() {
            view = view.tagged(&tag);
        }
    }
    if let Some(text) = &query.search {
        view = view.containing(text);
    }
    Ok(view)
}
