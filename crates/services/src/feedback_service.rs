use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{Feedback, FeedbackDraft};
use storage::repository::FeedbackRepository;

use crate::error::FeedbackServiceError;
use crate::identity::PlayerIdentity;
use crate::remote::RemoteProgressStore;

/// Post-quiz ratings: stored locally, mirrored to the remote store when one
/// is configured.
#[derive(Clone)]
pub struct FeedbackService {
    clock: Clock,
    local: Arc<dyn FeedbackRepository>,
    identity: PlayerIdentity,
    remote: Option<Arc<dyn RemoteProgressStore>>,
}

impl FeedbackService {
    #[must_use]
    pub fn new(
        clock: Clock,
        local: Arc<dyn FeedbackRepository>,
        identity: PlayerIdentity,
        remote: Option<Arc<dyn RemoteProgressStore>>,
    ) -> Self {
        Self {
            clock,
            local,
            identity,
            remote,
        }
    }

    /// Validate and store feedback.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackServiceError::Invalid` for a bad draft, or `Storage`
    /// if the local write fails. Remote failures are only logged.
    pub async fn submit(&self, draft: FeedbackDraft) -> Result<Feedback, FeedbackServiceError> {
        let feedback = draft.validate(self.clock.now())?;
        self.local.append_feedback(&feedback).await?;

        if let Some(remote) = &self.remote {
            match self.identity.resolve().await {
                Ok(player) => {
                    if let Err(e) = remote.push_feedback(&player, &feedback).await {
                        tracing::warn!(error = %e, "remote feedback write failed");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "no player id for remote feedback"),
            }
        }
        Ok(feedback)
    }

    /// Most recent feedback first.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackServiceError::Storage` if the entries cannot be read.
    pub async fn recent(&self, limit: u32) -> Result<Vec<Feedback>, FeedbackServiceError> {
        Ok(self.local.list_feedback(limit).await?)
    }
}
