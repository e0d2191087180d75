//! Deciding when the local copy needs refreshing.

use serde::Serialize;

use crate::client::RaindropApi;
use crate::models::User;
use crate::store::LocalStore;
use crate::Result;

/// Why a download happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadReason {
    /// Nothing had been downloaded yet
    NoLocalData,
    /// The server reported activity after the last download
    ServerNewer,
    /// The caller asked for a download regardless
    Forced,
}

impl DownloadReason {
    pub const fn describe(self) -> &'static str {
        match self {
            Self::NoLocalData => "no local data",
            Self::ServerNewer => "server has newer data",
            Self::Forced => "download forced",
        }
    }
}

/// What [`maybe_redownload`] ended up doing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    Downloaded {
        reason: DownloadReason,
        raindrops: usize,
        collections: usize,
    },
    UpToDate,
}

/// Result of a sync along with the account it ran for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub user: User,
    pub outcome: SyncOutcome,
}

/// Refresh the store from the server when it is out of date.
///
/// The user record is always fetched first; its `last_action` decides
/// whether the store is stale. A user with no recorded activity is always
/// re-downloaded. `force` downloads even when the store is current.
pub async fn maybe_redownload<A: RaindropApi>(
    store: &LocalStore<A>,
    force: bool,
) -> Result<SyncReport> {
    let user = store.api().user().await?;

    let reason = if store.downloaded_at().is_none() {
        Some(DownloadReason::NoLocalData)
    } else if user.last_action.is_none() || store.is_stale(user.last_action) {
        Some(DownloadReason::ServerNewer)
    } else if force {
        Some(DownloadReason::Forced)
    } else {
        None
    };

    let Some(reason) = reason else {
        tracing::info!("Local data is up to date for {}", user.full_name);
        return Ok(SyncReport {
            user,
            outcome: SyncOutcome::UpToDate,
        });
    };

    tracing::info!("Downloading: {}", reason.describe());
    let snapshot = store.download(&user).await?;
    Ok(SyncReport {
        user,
        outcome: SyncOutcome::Downloaded {
            reason,
            raindrops: snapshot.raindrops().len(),
            collections: snapshot.collections().len(),
        },
    })
}
