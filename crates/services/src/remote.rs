//! Remote key-value store for per-player progress and feedback.
//!
//! Paths follow the Realtime Database REST layout: `users/{uid}/level.json`,
//! `users/{uid}/points.json` and `feedback.json`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{Feedback, PlayerId};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::auth::AccountSlot;
use crate::config::RemoteStoreConfig;
use crate::error::RemoteStoreError;

#[async_trait]
pub trait RemoteProgressStore: Send + Sync {
    /// `Ok(None)` when the player has no stored level.
    ///
    /// # Errors
    ///
    /// Returns `RemoteStoreError` on transport failure or an unexpected value.
    async fn fetch_level(&self, player: &PlayerId) -> Result<Option<u32>, RemoteStoreError>;

    /// # Errors
    ///
    /// Returns `RemoteStoreError` on transport failure or an unexpected value.
    async fn fetch_points(&self, player: &PlayerId) -> Result<Option<u64>, RemoteStoreError>;

    /// # Errors
    ///
    /// Returns `RemoteStoreError` on transport failure.
    async fn put_level(&self, player: &PlayerId, level: u32) -> Result<(), RemoteStoreError>;

    /// # Errors
    ///
    /// Returns `RemoteStoreError` on transport failure.
    async fn put_points(&self, player: &PlayerId, points: u64) -> Result<(), RemoteStoreError>;

    /// # Errors
    ///
    /// Returns `RemoteStoreError` on transport failure.
    async fn push_feedback(
        &self,
        player: &PlayerId,
        feedback: &Feedback,
    ) -> Result<(), RemoteStoreError>;
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct FirebaseProgressStore {
    client: Client,
    config: RemoteStoreConfig,
    accounts: Option<Arc<AccountSlot>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoteFeedback<'a> {
    #[serde(flatten)]
    feedback: &'a Feedback,
    user_id: &'a str,
}

impl FirebaseProgressStore {
    #[must_use]
    pub fn new(config: RemoteStoreConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            config,
            accounts: None,
        }
    }

    /// Authenticate as the signed-in account when there is one.
    #[must_use]
    pub fn with_accounts(mut self, accounts: Arc<AccountSlot>) -> Self {
        self.accounts = Some(accounts);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}.json", self.config.base_url)
    }

    /// The account's ID token, else the configured token.
    fn auth_token(&self) -> Option<String> {
        self.accounts
            .as_ref()
            .and_then(|slot| slot.id_token())
            .or_else(|| self.config.auth_token.clone())
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_token() {
            Some(token) => request.query(&[("auth", token.as_str())]),
            None => request,
        }
    }

    async fn get_value(&self, path: &str) -> Result<Value, RemoteStoreError> {
        let response = self
            .with_auth(self.client.get(self.url(path)))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(RemoteStoreError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn put_value(&self, path: &str, value: &Value) -> Result<(), RemoteStoreError> {
        let response = self
            .with_auth(self.client.put(self.url(path)))
            .json(value)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(RemoteStoreError::HttpStatus(response.status()));
        }
        Ok(())
    }
}

pub(crate) fn value_as_u64(value: &Value) -> Result<Option<u64>, RemoteStoreError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .map(Some)
            .ok_or_else(|| RemoteStoreError::Malformed(n.to_string())),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| RemoteStoreError::Malformed(s.clone())),
        other => Err(RemoteStoreError::Malformed(other.to_string())),
    }
}

#[async_trait]
impl RemoteProgressStore for FirebaseProgressStore {
    async fn fetch_level(&self, player: &PlayerId) -> Result<Option<u32>, RemoteStoreError> {
        let value = self.get_value(&format!("users/{player}/level")).await?;
        value_as_u64(&value)?
            .map(|v| u32::try_from(v).map_err(|_| RemoteStoreError::Malformed(v.to_string())))
            .transpose()
    }

    async fn fetch_points(&self, player: &PlayerId) -> Result<Option<u64>, RemoteStoreError> {
        let value = self.get_value(&format!("users/{player}/points")).await?;
        value_as_u64(&value)
    }

    async fn put_level(&self, player: &PlayerId, level: u32) -> Result<(), RemoteStoreError> {
        self.put_value(&format!("users/{player}/level"), &Value::from(level))
            .await
    }

    async fn put_points(&self, player: &PlayerId, points: u64) -> Result<(), RemoteStoreError> {
        self.put_value(&format!("users/{player}/points"), &Value::from(points))
            .await
    }

    async fn push_feedback(
        &self,
        player: &PlayerId,
        feedback: &Feedback,
    ) -> Result<(), RemoteStoreError> {
        let body = RemoteFeedback {
            feedback,
            user_id: player.as_str(),
        };
        let response = self
            .with_auth(self.client.post(self.url("feedback")))
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(RemoteStoreError::HttpStatus(response.status()));
        }
        Ok(())
    }
}
