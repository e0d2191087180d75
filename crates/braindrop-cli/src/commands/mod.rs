pub mod auth_cmd;
pub mod collections;
pub mod common;
pub mod completions;
pub mod config;
pub mod list;
pub mod show;
pub mod status;
pub mod sync;
pub mod tags;
