//! Local copy of the user's raindrop.io data.
//!
//! A [`LocalStore`] owns one snapshot file and the in-memory [`Snapshot`]
//! loaded from it. Readers take a cheap `Arc` clone of the current snapshot
//! and filter it without holding any lock; a download builds a complete new
//! snapshot off to the side and swaps it in only once every fetch succeeded.

mod snapshot;

pub use snapshot::{Snapshot, SNAPSHOT_FORMAT_VERSION};

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::client::{Offline, RaindropApi};
use crate::models::{Collection, CollectionId, Raindrop, RaindropId, Tag, User};
use crate::tree::{self, CollectionNode};
use crate::view::{self, RaindropView};
use crate::{Error, Result};

/// Title of the view holding every raindrop
pub const ALL_TITLE: &str = "All";

/// Thread-safe handle on the local data file.
pub struct LocalStore<A = Offline> {
    inner: Arc<Inner<A>>,
}

struct Inner<A> {
    path: PathBuf,
    api: A,
    snapshot: RwLock<Arc<Snapshot>>,
    file_lock: Mutex<()>,
    downloading: AtomicBool,
}

impl<A> Clone for LocalStore<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> std::fmt::Debug for LocalStore<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore")
            .field("path", &self.inner.path)
            .field("downloaded_at", &self.downloaded_at())
            .finish_non_exhaustive()
    }
}

impl LocalStore<Offline> {
    /// A store that can load, query and forget, but never download.
    pub fn offline(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Offline)
    }
}

impl<A> LocalStore<A> {
    /// Create a store over `path`; nothing is read until [`Self::load`].
    pub fn new(path: impl Into<PathBuf>, api: A) -> Self {
        Self {
            inner: Arc::new(Inner {
                path: path.into(),
                api,
                snapshot: RwLock::new(Arc::new(Snapshot::empty())),
                file_lock: Mutex::new(()),
                downloading: AtomicBool::new(false),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    pub fn api(&self) -> &A {
        &self.inner.api
    }

    /// The snapshot currently in use.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let guard = self
            .inner
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        let mut guard = self
            .inner
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&snapshot);
        snapshot
    }

    /// Read the snapshot file into memory.
    ///
    /// A missing file is an empty store. A file that cannot be understood is
    /// moved aside, the store is reset to empty, and the error is returned so
    /// the caller can tell the user.
    pub async fn load(&self) -> Result<()> {
        let _file = self.inner.file_lock.lock().await;
        let path = self.inner.path.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            let result = Snapshot::read(&path);
            if matches!(result, Err(Error::CorruptSnapshot { .. })) {
                quarantine(&path);
            }
            result
        })
        .await
        .map_err(|error| Error::Io(io::Error::other(error)))?;

        match outcome {
            Ok(Some(snapshot)) => {
                tracing::debug!(
                    "Loaded {} raindrops and {} collections from {}",
                    snapshot.raindrops().len(),
                    snapshot.collections().len(),
                    self.inner.path.display()
                );
                self.replace(snapshot);
                Ok(())
            }
            Ok(None) => {
                tracing::debug!("No local data at {}", self.inner.path.display());
                self.replace(Snapshot::empty());
                Ok(())
            }
            Err(error) => {
                self.replace(Snapshot::empty());
                Err(error)
            }
        }
    }

    /// Write the current snapshot to disk.
    pub async fn save(&self) -> Result<()> {
        let _file = self.inner.file_lock.lock().await;
        write_snapshot(self.snapshot(), self.inner.path.clone()).await
    }

    /// Delete the local data file and start over empty.
    ///
    /// Refused with [`Error::DownloadInProgress`] while a download runs.
    pub async fn forget(&self) -> Result<()> {
        let _file = self.inner.file_lock.lock().await;
        if self.inner.downloading.load(Ordering::Acquire) {
            return Err(Error::DownloadInProgress);
        }
        match std::fs::remove_file(&self.inner.path) {
            Ok(()) => tracing::info!("Removed local data at {}", self.inner.path.display()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => return Err(Error::Io(error)),
        }
        self.replace(Snapshot::empty());
        Ok(())
    }

    pub fn downloaded_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot().downloaded_at()
    }

    /// Is the local data older than the server's last recorded activity?
    pub fn is_stale(&self, server_last_action: Option<DateTime<Utc>>) -> bool {
        self.snapshot().is_stale(server_last_action)
    }

    /// Every raindrop, in snapshot order.
    pub fn all(&self) -> RaindropView {
        RaindropView::new(ALL_TITLE, self.snapshot().raindrops().iter().cloned())
    }

    /// The raindrops that belong in the collection with `id`.
    pub fn in_collection(&self, id: CollectionId) -> RaindropView {
        view::by_collection(&self.all(), &self.collection(id))
    }

    /// Every raindrop carrying `tag`.
    pub fn tagged(&self, tag: &Tag) -> RaindropView {
        self.all().tagged(tag)
    }

    /// Every raindrop mentioning `text`.
    pub fn search(&self, text: &str) -> RaindropView {
        self.all().containing(text)
    }

    /// Look up a collection; unknown ids get a placeholder record.
    pub fn collection(&self, id: CollectionId) -> Collection {
        if let Some(special) = id.special() {
            return special.collection();
        }
        self.snapshot()
            .collections()
            .iter()
            .find(|collection| collection.id == id)
            .cloned()
            .unwrap_or_else(|| Collection::unknown(id))
    }

    pub fn collections(&self) -> Vec<Collection> {
        self.snapshot().collections().to_vec()
    }

    pub fn collection_tree(&self) -> Vec<CollectionNode> {
        tree::tree(self.snapshot().collections())
    }

    pub fn raindrop(&self, id: RaindropId) -> Option<Arc<Raindrop>> {
        self.snapshot()
            .raindrops()
            .iter()
            .find(|raindrop| raindrop.id == id)
            .cloned()
    }
}

impl<A: RaindropApi> LocalStore<A> {
    /// Replace the local data with a fresh copy from the server.
    ///
    /// Collections and raindrops are both fetched before anything changes;
    /// a failed fetch leaves the current snapshot in place. If writing the
    /// new snapshot to disk fails, the new data stays in memory and the
    /// write error is returned.
    pub async fn download(&self, user: &User) -> Result<Arc<Snapshot>> {
        let _download = DownloadGuard::acquire(&self.inner.downloading)?;
        tracing::info!("Downloading raindrops for {}", user.full_name);

        let collections = self.inner.api.collections().await?;
        let raindrops = self.inner.api.raindrops().await?;

        let _file = self.inner.file_lock.lock().await;
        let snapshot = self.replace(Snapshot::downloaded(collections, raindrops, Utc::now()));
        tracing::info!(
            "Downloaded {} raindrops in {} collections",
            snapshot.raindrops().len(),
            snapshot.collections().len()
        );

        if let Err(error) = write_snapshot(Arc::clone(&snapshot), self.inner.path.clone()).await {
            tracing::warn!(
                "Failed to save downloaded data to {}: {error}",
                self.inner.path.display()
            );
            return Err(error);
        }
        Ok(snapshot)
    }
}

/// Marks a download as running until dropped.
struct DownloadGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> DownloadGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::DownloadInProgress)?;
        Ok(Self { flag })
    }
}

impl Drop for DownloadGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

async fn write_snapshot(snapshot: Arc<Snapshot>, path: PathBuf) -> Result<()> {
    tokio::task::spawn_blocking(move || snapshot.write(&path))
        .await
        .map_err(|error| Error::Io(io::Error::other(error)))?
}

fn quarantine(path: &Path) {
    let timestamp = Utc::now().timestamp_millis();
    let file_name = path
        .file_name()
        .map_or_else(|| "raindrops.json".into(), |name| name.to_string_lossy());
    let backup_path = path.with_file_name(format!("{file_name}.corrupt-{timestamp}"));

    match std::fs::rename(path, &backup_path) {
        Ok(()) => tracing::warn!(
            "Moved unreadable local data from {} to {}",
            path.display(),
            backup_path.display()
        ),
        Err(error) => tracing::warn!(
            "Could not move unreadable local data at {}: {error}",
            path.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SpecialCollection;
    use crate::testing::ScriptedApi;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use std::time::Duration as StdDuration;
    use tempfile::tempdir;
    use tokio::sync::Notify;

    fn user() -> User {
        User::new(7, "Dale").with_last_action(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
    }

    fn collections() -> Vec<Collection> {
        vec![
            Collection::new(CollectionId::new(1), "Reading"),
            Collection::new(CollectionId::new(2), "Rust").with_parent(CollectionId::new(1)),
        ]
    }

    fn raindrops() -> Vec<Raindrop> {
        vec![
            Raindrop::new(RaindropId::new(1), CollectionId::new(1))
                .with_title("Rust async book")
                .with_tags(["Rust", "async"]),
            Raindrop::new(RaindropId::new(2), CollectionId::new(1))
                .with_title("Tokio tutorial")
                .with_tags(["rust"])
                .with_broken(true),
            Raindrop::new(RaindropId::new(3), CollectionId::new(-1)).with_title("Loose link"),
        ]
    }

    fn api() -> ScriptedApi {
        ScriptedApi::new(user(), collections(), raindrops())
    }

    fn ids(view: &RaindropView) -> Vec<i64> {
        view.ids().into_iter().map(RaindropId::get).collect()
    }

    #[tokio::test(flavor = "current_thread")]
    async fn fresh_store_is_empty_and_stale() {
        let dir = tempdir().unwrap();
        let store = LocalStore::offline(dir.path().join("raindrops.json"));
        store.load().await.unwrap();

        assert!(store.all().is_empty());
        assert_eq!(store.all().title(), "All");
        assert_eq!(store.downloaded_at(), None);
        assert!(store.is_stale(None));
        assert!(store.is_stale(Some(Utc::now())));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn download_replaces_data_and_persists_it() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raindrops.json");
        let store = LocalStore::new(&path, api());

        let before = Utc::now();
        let snapshot = store.download(&user()).await.unwrap();
        let downloaded_at = snapshot.downloaded_at().unwrap();
        assert!(downloaded_at >= before);
        assert_eq!(store.all().len(), 3);
        assert!(!store.is_stale(Some(downloaded_at)));
        assert!(!store.is_stale(None));
        assert!(store.is_stale(Some(downloaded_at + Duration::seconds(1))));

        let reopened = LocalStore::offline(&path);
        reopened.load().await.unwrap();
        assert_eq!(ids(&reopened.all()), vec![1, 2, 3]);
        assert_eq!(reopened.collections(), collections());
        assert_eq!(reopened.downloaded_at(), Some(downloaded_at));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failed_fetch_leaves_snapshot_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raindrops.json");
        let store = LocalStore::new(&path, api());
        store.download(&user()).await.unwrap();
        let previous = store.snapshot();

        for api in [
            api().failing_collections("collections down"),
            api().failing_raindrops("raindrops down"),
        ] {
            let failing = LocalStore::new(&path, api);
            failing.load().await.unwrap();
            let loaded_at = failing.downloaded_at();

            let error = failing.download(&user()).await.unwrap_err();
            assert!(matches!(error, Error::Api(_)));
            assert_eq!(failing.downloaded_at(), loaded_at);
            assert_eq!(ids(&failing.all()), vec![1, 2, 3]);
        }

        let on_disk = LocalStore::offline(&path);
        on_disk.load().await.unwrap();
        assert_eq!(on_disk.downloaded_at(), previous.downloaded_at());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn persist_failure_keeps_new_data_in_memory() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();
        let store = LocalStore::new(blocker.join("raindrops.json"), api());

        let error = store.download(&user()).await.unwrap_err();
        assert!(matches!(error, Error::Io(_)));
        assert_eq!(store.all().len(), 3);
        assert!(store.downloaded_at().is_some());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn corrupt_file_is_quarantined() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raindrops.json");
        std::fs::write(&path, "{ definitely not json").unwrap();
        let store = LocalStore::offline(&path);

        let error = store.load().await.unwrap_err();
        assert!(matches!(error, Error::CorruptSnapshot { .. }));
        assert!(store.all().is_empty());
        assert!(!path.exists());

        let quarantined = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with("raindrops.json.corrupt-")
            })
            .count();
        assert_eq!(quarantined, 1);

        store.load().await.unwrap();
    }

    #[tokio::test(flavor = "current_thread")]
    async fn second_download_is_refused_while_one_runs() {
        let dir = tempdir().unwrap();
        let gate = Arc::new(Notify::new());
        let store = LocalStore::new(dir.path().join("raindrops.json"), api().gated(Arc::clone(&gate)));
        let user = user();

        let (first, second, ()) = tokio::join!(store.download(&user), store.download(&user), async {
            gate.notify_one();
        });

        assert!(first.is_ok());
        assert!(matches!(second, Err(Error::DownloadInProgress)));
        assert_eq!(store.api().collection_calls(), 1);
        assert_eq!(store.all().len(), 3);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn abandoned_download_commits_nothing_and_releases_the_guard() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raindrops.json");
        let gate = Arc::new(Notify::new());
        let store = LocalStore::new(&path, api().gated(Arc::clone(&gate)));
        let user = user();

        let abandoned =
            tokio::time::timeout(StdDuration::from_millis(20), store.download(&user)).await;
        assert!(abandoned.is_err());
        assert!(store.all().is_empty());
        assert!(!path.exists());

        gate.notify_one();
        store.download(&user).await.unwrap();
        assert_eq!(store.all().len(), 3);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn collection_lookup_never_fails() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("raindrops.json"), api());
        store.download(&user()).await.unwrap();

        assert_eq!(store.collection(CollectionId::new(2)).title, "Rust");
        assert_eq!(store.collection(CollectionId::new(-1)).title, "Unsorted");
        let unknown = store.collection(CollectionId::new(404));
        assert_eq!(unknown.id, CollectionId::new(404));
        assert_eq!(unknown.title, "Unknown");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn views_follow_collection_rules() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("raindrops.json"), api());
        store.download(&user()).await.unwrap();

        assert_eq!(ids(&store.in_collection(CollectionId::new(1))), vec![1, 2]);
        assert_eq!(ids(&store.in_collection(SpecialCollection::Unsorted.id())), vec![3]);
        assert_eq!(ids(&store.in_collection(SpecialCollection::Untagged.id())), vec![3]);
        assert_eq!(ids(&store.in_collection(SpecialCollection::Broken.id())), vec![2]);
        assert!(store.in_collection(SpecialCollection::Trash.id()).is_empty());
        assert_eq!(store.in_collection(CollectionId::new(1)).title(), "Reading");

        let rust = store.tagged(&Tag::new("RUST"));
        assert_eq!(ids(&rust), vec![1, 2]);
        assert_eq!(ids(&rust.containing("tokio")), vec![2]);
        assert_eq!(ids(&rust.containing("tokio").unfiltered()), vec![1, 2, 3]);
        assert_eq!(ids(&store.search("LOOSE")), vec![3]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn reader_views_survive_a_reset() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("raindrops.json"), api());
        store.download(&user()).await.unwrap();
        let held = store.all();

        store.forget().await.unwrap();
        assert!(store.all().is_empty());
        assert_eq!(held.len(), 3);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn forget_removes_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raindrops.json");
        let store = LocalStore::new(&path, api());
        store.download(&user()).await.unwrap();
        assert!(path.exists());

        store.forget().await.unwrap();
        assert!(!path.exists());
        assert_eq!(store.downloaded_at(), None);
        store.forget().await.unwrap();
    }

    #[tokio::test(flavor = "current_thread")]
    async fn forget_is_refused_while_a_download_runs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raindrops.json");
        let gate = Arc::new(Notify::new());
        let store = LocalStore::new(&path, api().gated(Arc::clone(&gate)));
        let user = user();

        let (downloaded, forgotten, ()) =
            tokio::join!(store.download(&user), store.forget(), async {
                gate.notify_one();
            });

        assert!(downloaded.is_ok());
        assert!(matches!(forgotten, Err(Error::DownloadInProgress)));
        assert!(path.exists());
        assert_eq!(store.all().len(), 3);

        store.forget().await.unwrap();
        assert!(!path.exists());
        assert!(store.all().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn writes_run_off_the_async_workers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("raindrops.json");
        let store = LocalStore::new(&path, api());
        store.download(&user()).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        store.save().await.unwrap();
        let reopened = LocalStore::offline(&path);
        reopened.load().await.unwrap();
        assert_eq!(ids(&reopened.all()), vec![1, 2, 3]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn save_writes_current_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("raindrops.json");
        let store = LocalStore::offline(&path);
        store.save().await.unwrap();

        let reopened = LocalStore::offline(&path);
        reopened.load().await.unwrap();
        assert_eq!(reopened.downloaded_at(), None);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn offline_store_cannot_download() {
        let dir = tempdir().unwrap();
        let store = LocalStore::offline(dir.path().join("raindrops.json"));
        let error = store.download(&user()).await.unwrap_err();
        assert!(matches!(error, Error::Api(_)));
    }
}
