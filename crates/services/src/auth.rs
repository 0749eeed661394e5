//! Email/password accounts.
//!
//! [`FirebaseAuth`] talks to the Identity Toolkit REST API. The signed-in
//! account lives in an [`AccountSlot`] shared with the player identity and the
//! remote store, so signing in or out takes effect for both at once.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use quiz_core::model::PlayerId;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Shortest password the auth provider accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A signed-in account.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountSession {
    pub uid: PlayerId,
    pub email: Option<String>,
    /// Bearer for the remote store; absent for a configured uid.
    pub id_token: Option<String>,
}

impl AccountSession {
    /// An account known only by its uid.
    #[must_use]
    pub fn from_uid(uid: PlayerId) -> Self {
        Self {
            uid,
            email: None,
            id_token: None,
        }
    }

    /// What the UI shows for the account.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or_else(|| self.uid.as_str())
    }
}

impl fmt::Debug for AccountSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountSession")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("id_token", &self.id_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// The current account, if any.
#[derive(Debug, Default)]
pub struct AccountSlot {
    current: RwLock<Option<AccountSession>>,
}

impl AccountSlot {
    #[must_use]
    pub fn new(initial: Option<AccountSession>) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<AccountSession> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn uid(&self) -> Option<PlayerId> {
        self.current().map(|s| s.uid)
    }

    #[must_use]
    pub fn id_token(&self) -> Option<String> {
        self.current().and_then(|s| s.id_token)
    }

    pub fn set(&self, session: AccountSession) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    pub fn clear(&self) -> Option<AccountSession> {
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Creates and authenticates email/password accounts.
#[async_trait]
pub trait AccountAuth: Send + Sync {
    /// False when no provider is configured.
    fn enabled(&self) -> bool {
        true
    }

    /// # Errors
    ///
    /// Returns `AuthError` when the provider refuses the account.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AccountSession, AuthError>;

    /// # Errors
    ///
    /// Returns `AuthError` for unknown accounts or wrong passwords.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AccountSession, AuthError>;
}

#[derive(Clone)]
pub struct FirebaseAuth {
    client: Client,
    config: Option<AuthConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    id_token: String,
    #[serde(default)]
    email: Option<String>,
}

impl AccountResponse {
    fn into_session(self) -> Result<AccountSession, AuthError> {
        let uid = self
            .local_id
            .parse()
            .map_err(|_| AuthError::Malformed(self.local_id.clone()))?;
        Ok(AccountSession {
            uid,
            email: self.email,
            id_token: Some(self.id_token),
        })
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl FirebaseAuth {
    #[must_use]
    pub fn new(config: Option<AuthConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn post_credentials(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<AccountSession, AuthError> {
        let config = self.config.as_ref().ok_or(AuthError::Disabled)?;
        let url = format!("{}/accounts:{endpoint}", config.base_url);
        let response = self
            .client
            .post(url)
            .query(&[("key", config.api_key.as_str())])
            .json(&CredentialsRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status, &body));
        }
        let account: AccountResponse = response.json().await?;
        account.into_session()
    }
}

#[async_trait]
impl AccountAuth for FirebaseAuth {
    fn enabled(&self) -> bool {
        self.config.is_some()
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AccountSession, AuthError> {
        self.post_credentials("signUp", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AccountSession, AuthError> {
        self.post_credentials("signInWithPassword", email, password)
            .await
    }
}

fn error_from_body(status: reqwest::StatusCode, body: &str) -> AuthError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => error_from_code(&envelope.error.message),
        Err(_) => AuthError::HttpStatus(status),
    }
}

/// Map a provider error code such as `"WEAK_PASSWORD : Password should be..."`.
fn error_from_code(message: &str) -> AuthError {
    let code = message.split(':').next().unwrap_or(message).trim();
    match code {
        "EMAIL_EXISTS" => AuthError::EmailExists,
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            AuthError::InvalidCredentials
        }
        "INVALID_EMAIL" | "MISSING_EMAIL" => AuthError::InvalidEmail,
        "WEAK_PASSWORD" | "MISSING_PASSWORD" => AuthError::WeakPassword {
            min: MIN_PASSWORD_LEN,
        },
        "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthError::TooManyAttempts,
        other => AuthError::Rejected(other.to_string()),
    }
}

/// Trimmed email, or the reason the credentials cannot be sent.
///
/// # Errors
///
/// Returns `AuthError::InvalidEmail` or `AuthError::WeakPassword`.
pub fn validate_credentials(email: &str, password: &str) -> Result<String, AuthError> {
    let email = email.trim();
    let plausible = email.split_once('@').is_some_and(|(user, domain)| {
        !user.is_empty()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
    });
    if !plausible {
        return Err(AuthError::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(email.to_string())
}

/// Sign-up, sign-in and sign-out against the shared [`AccountSlot`].
#[derive(Clone)]
pub struct AccountService {
    auth: Arc<dyn AccountAuth>,
    slot: Arc<AccountSlot>,
}

impl AccountService {
    #[must_use]
    pub fn new(auth: Arc<dyn AccountAuth>, slot: Arc<AccountSlot>) -> Self {
        Self { auth, slot }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.auth.enabled()
    }

    #[must_use]
    pub fn current(&self) -> Option<AccountSession> {
        self.slot.current()
    }

    /// # Errors
    ///
    /// Returns `AuthError` for invalid credentials or a refused account.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AccountSession, AuthError> {
        let email = validate_credentials(email, password)?;
        let session = self.auth.sign_up(&email, password).await?;
        tracing::info!(uid = %session.uid, "account created");
        self.slot.set(session.clone());
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns `AuthError` for invalid credentials or a refused sign-in.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AccountSession, AuthError> {
        let email = validate_credentials(email, password)?;
        let session = self.auth.sign_in(&email, password).await?;
        tracing::info!(uid = %session.uid, "signed in");
        self.slot.set(session.clone());
        Ok(session)
    }

    /// Forget the current account; progress falls back to the device id.
    pub fn sign_out(&self) -> Option<AccountSession> {
        let previous = self.slot.clear();
        if let Some(session) = &previous {
            tracing::info!(uid = %session.uid, "signed out");
        }
        previous
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory accounts keyed by email.
    #[derive(Default)]
    pub(crate) struct FakeAuth {
        accounts: Mutex<HashMap<String, (String, String)>>,
    }

    #[async_trait]
    impl AccountAuth for FakeAuth {
        async fn sign_up(&self, email: &str, password: &str) -> Result<AccountSession, AuthError> {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(email) {
                return Err(AuthError::EmailExists);
            }
            let uid = format!("uid{}", accounts.len() + 1);
            accounts.insert(email.to_string(), (uid.clone(), password.to_string()));
            Ok(AccountSession {
                uid: uid.parse().unwrap(),
                email: Some(email.to_string()),
                id_token: Some(format!("token-{uid}")),
            })
        }

        async fn sign_in(&self, email: &str, password: &str) -> Result<AccountSession, AuthError> {
            let accounts = self.accounts.lock().unwrap();
            match accounts.get(email) {
                Some((uid, stored)) if stored == password => Ok(AccountSession {
                    uid: uid.parse().unwrap(),
                    email: Some(email.to_string()),
                    id_token: Some(format!("token-{uid}")),
                }),
                _ => Err(AuthError::InvalidCredentials),
            }
        }
    }

    #[test]
    fn provider_codes_map_to_errors() {
        assert!(matches!(error_from_code("EMAIL_EXISTS"), AuthError::EmailExists));
        assert!(matches!(
            error_from_code("INVALID_LOGIN_CREDENTIALS"),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            error_from_code("WEAK_PASSWORD : Password should be at least 6 characters"),
            AuthError::WeakPassword { min: 6 }
        ));
        assert!(matches!(
            error_from_code("USER_DISABLED"),
            AuthError::Rejected(code) if code == "USER_DISABLED"
        ));
    }

    #[test]
    fn error_bodies_fall_back_to_status() {
        let body = r#"{"error":{"code":400,"message":"EMAIL_NOT_FOUND","errors":[]}}"#;
        assert!(matches!(
            error_from_body(reqwest::StatusCode::BAD_REQUEST, body),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            error_from_body(reqwest::StatusCode::BAD_GATEWAY, "<html>"),
            AuthError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY)
        ));
    }

    #[test]
    fn account_response_becomes_session() {
        let response: AccountResponse = serde_json::from_str(
            r#"{"kind":"identitytoolkit#SignupNewUserResponse","localId":"Qx7abc","idToken":"jwt","email":"a@b.io","expiresIn":"3600"}"#,
        )
        .unwrap();
        let session = response.into_session().unwrap();
        assert_eq!(session.uid.as_str(), "Qx7abc");
        assert_eq!(session.display_name(), "a@b.io");
        assert_eq!(session.id_token.as_deref(), Some("jwt"));
        assert!(!format!("{session:?}").contains("jwt"));
    }

    #[test]
    fn credentials_are_checked_before_sending() {
        assert_eq!(validate_credentials(" ada@lovelace.dev ", "secret1").unwrap(), "ada@lovelace.dev");
        assert!(matches!(validate_credentials("ada", "secret1"), Err(AuthError::InvalidEmail)));
        assert!(matches!(validate_credentials("ada@localhost", "secret1"), Err(AuthError::InvalidEmail)));
        assert!(matches!(
            validate_credentials("ada@lovelace.dev", "12345"),
            Err(AuthError::WeakPassword { min: 6 })
        ));
    }

    #[tokio::test]
    async fn disabled_provider_refuses_requests() {
        let auth = FirebaseAuth::new(None);
        assert!(!auth.enabled());
        assert!(matches!(
            auth.sign_in("ada@lovelace.dev", "secret1").await,
            Err(AuthError::Disabled)
        ));
    }

    #[tokio::test]
    async fn sign_in_and_out_update_the_slot() {
        let slot = Arc::new(AccountSlot::default());
        let accounts = AccountService::new(Arc::new(FakeAuth::default()), slot.clone());

        let created = accounts.sign_up("ada@lovelace.dev", "secret1").await.unwrap();
        assert_eq!(slot.uid(), Some(created.uid.clone()));
        assert!(accounts.sign_out().is_some());
        assert!(slot.current().is_none());

        assert!(matches!(
            accounts.sign_in("ada@lovelace.dev", "wrong-pass").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(slot.current().is_none());

        let session = accounts.sign_in("ada@lovelace.dev", "secret1").await.unwrap();
        assert_eq!(session.uid, created.uid);
        assert_eq!(slot.id_token().as_deref(), Some("token-uid1"));
    }
}
