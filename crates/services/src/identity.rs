use std::sync::Arc;

use quiz_core::model::PlayerId;
use storage::repository::{IdentityRepository, StorageError};

use crate::auth::{AccountSession, AccountSlot};

/// Resolves who the current player is.
///
/// A signed-in account uid wins; otherwise a device id is generated once and
/// kept in local storage.
#[derive(Clone)]
pub struct PlayerIdentity {
    repo: Arc<dyn IdentityRepository>,
    accounts: Arc<AccountSlot>,
}

impl PlayerIdentity {
    /// Identity with its own slot, seeded with a fixed account uid.
    #[must_use]
    pub fn new(repo: Arc<dyn IdentityRepository>, account: Option<PlayerId>) -> Self {
        let slot = AccountSlot::new(account.map(AccountSession::from_uid));
        Self::with_accounts(repo, Arc::new(slot))
    }

    #[must_use]
    pub fn with_accounts(repo: Arc<dyn IdentityRepository>, accounts: Arc<AccountSlot>) -> Self {
        Self { repo, accounts }
    }

    #[must_use]
    pub fn accounts(&self) -> &Arc<AccountSlot> {
        &self.accounts
    }

    #[must_use]
    pub fn account(&self) -> Option<PlayerId> {
        self.accounts.uid()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.accounts.current().is_some()
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the device id cannot be read or stored.
    pub async fn resolve(&self) -> Result<PlayerId, StorageError> {
        if let Some(account) = self.account() {
            return Ok(account);
        }
        if let Some(existing) = self.repo.get_player_id().await? {
            return Ok(existing);
        }
        let fresh = PlayerId::generate();
        self.repo.save_player_id(&fresh).await?;
        tracing::info!(player = %fresh, "generated device player id");
        Ok(fresh)
    }
}
