//! braindrop-core - Core library for Braindrop
//!
//! This crate keeps a local copy of a raindrop.io account (collections and
//! raindrops), decides when that copy is stale, and answers navigation
//! queries against it: the collection tree and filtered raindrop views.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod sync;
pub mod tree;
pub mod util;
pub mod view;

#[cfg(test)]
mod testing;

pub use client::{Offline, RaindropApi, RaindropClient};
pub use config::{AppPaths, ClientConfig};
pub use error::{ApiError, Error, Result};
pub use models::{
    Collection, CollectionId, Raindrop, RaindropId, RaindropType, SpecialCollection, Tag, User,
};
pub use store::{LocalStore, Snapshot};
pub use sync::{maybe_redownload, DownloadReason, SyncOutcome, SyncReport};
pub use tree::CollectionNode;
pub use view::{RaindropView, TagCount, TagOrder, ViewFilter};
