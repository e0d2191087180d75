use std::path::Path;

use braindrop_core::{CollectionNode, LocalStore};
use serde::Serialize;

use crate::commands::common::{open_store, print_json};
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct CollectionTreeItem {
    pub id: i64,
    pub title: String,
    pub count: usize,
    pub children: Vec<CollectionTreeItem>,
}

pub async fn run_collections(as_json: bool, data_file: &Path) -> Result<(), CliError> {
    let store = open_store(data_file).await?;
    let forest = store.collection_tree();

    if as_json {
        let items = forest
            .iter()
            .map(|node| tree_item(node, &store))
            .collect::<Vec<_>>();
        return print_json(&items);
    }

    for line in format_tree_lines(&forest, &store) {
        println!("{line}");
    }
    Ok(())
}

/// Counts are of local raindrops, not the server's own tally.
pub fn tree_item<A>(node: &CollectionNode, store: &LocalStore<A>) -> CollectionTreeItem {
    CollectionTreeItem {
        id: node.collection.id.get(),
        title: node.collection.title.clone(),
        count: store.in_collection(node.collection.id).len(),
        children: node
            .children
            .iter()
            .map(|child| tree_item(child, store))
            .collect(),
    }
}

pub fn format_tree_lines<A>(forest: &[CollectionNode], store: &LocalStore<A>) -> Vec<String> {
    braindrop_core::tree::walk(forest)
        .into_iter()
        .map(|(depth, collection)| {
            let count = store.in_collection(collection.id).len();
            let indent = "  ".repeat(depth);
            format!(
                "{indent}{} ({count})  [{}]",
                collection.title, collection.id
            )
        })
        .collect()
}
