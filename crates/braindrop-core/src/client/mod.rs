//! raindrop.io REST client.
//!
//! The local store only ever needs three things from the server: who the
//! token belongs to, every collection, and every raindrop. [`RaindropApi`]
//! is that seam; [`RaindropClient`] is the `reqwest` implementation.

mod wire;

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::{Collection, Raindrop, SpecialCollection, User};

use wire::{ItemsEnvelope, UserEnvelope, WireCollection, WireRaindrop};

/// Largest page size the raindrops endpoint accepts.
const RAINDROPS_PER_PAGE: usize = 50;

pub type ApiResult<T> = Result<T, ApiError>;

/// Operations the local store needs from the remote service.
#[allow(async_fn_in_trait)]
pub trait RaindropApi {
    /// Details of the user the token belongs to
    async fn user(&self) -> ApiResult<User>;

    /// Every collection, roots and children
    async fn collections(&self) -> ApiResult<Vec<Collection>>;

    /// Every raindrop outside of the trash
    async fn raindrops(&self) -> ApiResult<Vec<Raindrop>>;
}

/// Stand-in API for working from the local snapshot alone.
///
/// Every call fails, so a store built on it can load, query and forget but
/// never download.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl RaindropApi for Offline {
    async fn user(&self) -> ApiResult<User> {
        Err(offline_error())
    }

    async fn collections(&self) -> ApiResult<Vec<Collection>> {
        Err(offline_error())
    }

    async fn raindrops(&self) -> ApiResult<Vec<Raindrop>> {
        Err(offline_error())
    }
}

fn offline_error() -> ApiError {
    ApiError::new("No Raindrop API token is configured")
}

/// HTTP client for raindrop.io, bound to one access token.
#[derive(Clone)]
pub struct RaindropClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for RaindropClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RaindropClient")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl RaindropClient {
    pub fn new(access_token: impl Into<String>, config: &ClientConfig) -> ApiResult<Self> {
        let token = access_token.into().trim().to_string();
        if token.is_empty() {
            return Err(ApiError::new("Raindrop access token must not be empty"));
        }
        let base_url = config
            .normalized_base_url()
            .map_err(|error| ApiError::new(error.to_string()))?;

        Ok(Self {
            base_url,
            token,
            client: reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .timeout(config.timeout)
                .build()?,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let response = self
            .client
            .get(self.api_url(path))
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::new(wire::error_message(status, &body)));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|error| ApiError::new(format!("Unexpected response from {path}: {error}")))
    }

    async fn collection_level(&self, path: &str) -> ApiResult<Vec<Collection>> {
        let (items, _) = self
            .get::<ItemsEnvelope<WireCollection>>(path, &[])
            .await?
            .into_items()?;
        Ok(items.into_iter().map(Collection::from).collect())
    }
}

impl RaindropApi for RaindropClient {
    async fn user(&self) -> ApiResult<User> {
        self.get::<UserEnvelope>("user", &[]).await?.into_user()
    }

    async fn collections(&self) -> ApiResult<Vec<Collection>> {
        let mut collections = self.collection_level("collections").await?;
        collections.extend(self.collection_level("collections/childrens").await?);
        tracing::debug!("Fetched {} collections", collections.len());
        Ok(collections)
    }

    async fn raindrops(&self) -> ApiResult<Vec<Raindrop>> {
        let path = format!("raindrops/{}", SpecialCollection::All.id());
        let mut raindrops = Vec::new();
        let mut page = 0usize;

        loop {
            let (items, total) = self
                .get::<ItemsEnvelope<WireRaindrop>>(
                    &path,
                    &[
                        ("perpage", RAINDROPS_PER_PAGE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?
                .into_items()?;

            let fetched = items.len();
            raindrops.extend(items.into_iter().map(Raindrop::from));
            tracing::debug!(
                "Fetched raindrop page {page} ({fetched} items, {} so far)",
                raindrops.len()
            );

            let reached_total = total.is_some_and(|total| raindrops.len() as u64 >= total);
            if fetched < RAINDROPS_PER_PAGE || reached_total {
                break;
            }
            page += 1;
        }

        Ok(raindrops)
    }
}
