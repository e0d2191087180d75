use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] braindrop_core::Error),
    #[error(transparent)]
    Api(#[from] braindrop_core::ApiError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("API token cannot be empty")]
    EmptyToken,
    #[error("Invalid raindrop ID: {0}")]
    InvalidRaindropId(String),
    #[error("Raindrop not found: {0}")]
    RaindropNotFound(String),
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
    #[error("{0}")]
    AmbiguousCollection(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "No Raindrop API token found. Run `braindrop login --token <TOKEN>` or set BRAINDROP_API_TOKEN."
    )]
    NotLoggedIn,
}
