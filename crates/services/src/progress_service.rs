use std::sync::{Arc, Mutex, PoisonError};

use quiz_core::model::{PlayerId, PlayerProgress, clamp_level};
use storage::repository::ProgressRepository;
use tokio::task::JoinHandle;

use crate::error::ProgressError;
use crate::identity::PlayerIdentity;
use crate::remote::RemoteProgressStore;

/// Level and points, local-first with a best-effort remote copy.
///
/// Local storage is always read and written; the remote store is consulted
/// only when configured and its failures are logged, never returned. Remote
/// writes run as background tasks so saving never waits on the network.
#[derive(Clone)]
pub struct ProgressService {
    local: Arc<dyn ProgressRepository>,
    identity: PlayerIdentity,
    remote: Option<Arc<dyn RemoteProgressStore>>,
    syncs: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

#[derive(Debug, Clone, Copy)]
enum RemoteWrite {
    Level(u32),
    Points(u64),
}

async fn push_remote(remote: Arc<dyn RemoteProgressStore>, player: PlayerId, write: RemoteWrite) {
    let result = match write {
        RemoteWrite::Level(level) => remote.put_level(&player, level).await,
        RemoteWrite::Points(points) => remote.put_points(&player, points).await,
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, ?write, "remote progress sync failed");
    }
}

impl ProgressService {
    #[must_use]
    pub fn new(
        local: Arc<dyn ProgressRepository>,
        identity: PlayerIdentity,
        remote: Option<Arc<dyn RemoteProgressStore>>,
    ) -> Self {
        Self {
            local,
            identity,
            remote,
            syncs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[must_use]
    pub fn identity(&self) -> &PlayerIdentity {
        &self.identity
    }

    /// Progress as stored on this device, without asking the remote store.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if local storage cannot be read.
    pub async fn local_progress(&self) -> Result<PlayerProgress, ProgressError> {
        let mut progress = self.local.get_progress().await?;
        progress.level = clamp_level(progress.level);
        Ok(progress)
    }

    /// Current progress.
    ///
    /// For a signed-in account, remote values win and are copied into local
    /// storage; anything missing or failing falls back to the local copy.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if local storage cannot be read.
    pub async fn load(&self) -> Result<PlayerProgress, ProgressError> {
        let mut progress = self.local.get_progress().await?;

        if let (Some(remote), Some(account)) = (&self.remote, self.identity.account()) {
            match remote.fetch_level(&account).await {
                Ok(Some(level)) => {
                    let level = clamp_level(level);
                    if level != progress.level {
                        self.local.save_level(level).await?;
                    }
                    progress.level = level;
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "failed to fetch level from remote store"),
            }
            match remote.fetch_points(&account).await {
                Ok(Some(points)) => {
                    if points != progress.points {
                        self.local.save_points(points).await?;
                    }
                    progress.points = points;
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "failed to fetch points from remote store"),
            }
        }

        progress.level = clamp_level(progress.level);
        Ok(progress)
    }

    /// Store a new level (clamped to the valid range).
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if local storage cannot be written.
    pub async fn save_level(&self, level: u32) -> Result<u32, ProgressError> {
        let level = clamp_level(level);
        self.local.save_level(level).await?;
        self.queue_remote(RemoteWrite::Level(level)).await;
        Ok(level)
    }

    /// # Errors
    ///
    /// Returns `ProgressError` if local storage cannot be written.
    pub async fn save_points(&self, points: u64) -> Result<(), ProgressError> {
        self.local.save_points(points).await?;
        self.queue_remote(RemoteWrite::Points(points)).await;
        Ok(())
    }

    /// Wait for every queued remote write to finish.
    pub async fn flush_remote(&self) {
        let pending = {
            let mut syncs = self.syncs.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *syncs)
        };
        for handle in pending {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "remote sync task did not complete");
            }
        }
    }

    /// The player is resolved now so a later sign-out cannot redirect the write.
    async fn queue_remote(&self, write: RemoteWrite) {
        let Some(remote) = self.remote.clone() else {
            return;
        };
        let player = match self.identity.resolve().await {
            Ok(player) => player,
            Err(e) => {
                tracing::warn!(error = %e, ?write, "no player id for remote sync");
                return;
            }
        };
        let task = push_remote(remote, player, write);
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let mut syncs = self.syncs.lock().unwrap_or_else(PoisonError::into_inner);
                syncs.retain(|handle| !handle.is_finished());
                syncs.push(runtime.spawn(task));
            }
            Err(_) => task.await,
        }
    }
}
