//! Scripted API used by the store and sync tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

use crate::client::{ApiResult, RaindropApi};
use crate::error::ApiError;
use crate::models::{Collection, Raindrop, User};

#[derive(Debug, Clone)]
pub struct ScriptedApi {
    pub user: ApiResult<User>,
    pub collections: ApiResult<Vec<Collection>>,
    pub raindrops: ApiResult<Vec<Raindrop>>,
    /// When set, `collections()` waits here before answering.
    pub gate: Option<Arc<Notify>>,
    pub collection_calls: Arc<AtomicUsize>,
}

impl ScriptedApi {
    pub fn new(user: User, collections: Vec<Collection>, raindrops: Vec<Raindrop>) -> Self {
        Self {
            user: Ok(user),
            collections: Ok(collections),
            raindrops: Ok(raindrops),
            gate: None,
            collection_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing_user(mut self, message: &str) -> Self {
        self.user = Err(ApiError::new(message));
        self
    }

    pub fn failing_collections(mut self, message: &str) -> Self {
        self.collections = Err(ApiError::new(message));
        self
    }

    pub fn failing_raindrops(mut self, message: &str) -> Self {
        self.raindrops = Err(ApiError::new(message));
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn collection_calls(&self) -> usize {
        self.collection_calls.load(Ordering::SeqCst)
    }
}

impl RaindropApi for ScriptedApi {
    async fn user(&self) -> ApiResult<User> {
        self.user.clone()
    }

    async fn collections(&self) -> ApiResult<Vec<Collection>> {
        self.collection_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.collections.clone()
    }

    async fn raindrops(&self) -> ApiResult<Vec<Raindrop>> {
        self.raindrops.clone()
    }
}
