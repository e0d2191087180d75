use std::path::Path;

use braindrop_core::{TagCount, TagOrder};

use crate::commands::common::{open_store, print_json, resolve_collection};
use crate::error::CliError;

pub async fn run_tags(
    collection: Option<&str>,
    order: TagOrder,
    as_json: bool,
    data_file: &Path,
) -> Result<(), CliError> {
    let store = open_store(data_file).await?;
    let view = match collection {
        Some(query) => store.in_collection(resolve_collection(&store, query)?.id),
        None => store.all(),
    };
    let tags = view.tags(order);

    if as_json {
        return print_json(&tags);
    }

    if tags.is_empty() {
        println!("No tags in {}.", view.title());
        return Ok(());
    }
    for line in format_tag_lines(&tags) {
        println!("{line}");
    }
    Ok(())
}

pub fn format_tag_lines(tags: &[TagCount]) -> Vec<String> {
    let width = tags
        .iter()
        .map(|entry| entry.tag.name().chars().count())
        .max()
        .unwrap_or(0);
    tags.iter()
        .map(|entry| format!("{:<width$}  {}", entry.tag.name(), entry.count))
        .collect()
}
