//! Environment-driven configuration for the outer services.
//!
//! Every reader takes a lookup function so tests can feed a map instead of
//! mutating the process environment.

use std::env;
use std::time::Duration;

use quiz_core::model::PlayerId;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_AUTH_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_AUTO_GEN_SECS: u64 = 300;

fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub tts_model: String,
}

impl GeminiConfig {
    /// `None` when `QUIZ_GEMINI_API_KEY` is missing or blank.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(env_lookup)
    }

    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let api_key = non_blank(lookup("QUIZ_GEMINI_API_KEY"))?;
        let base_url = non_blank(lookup("QUIZ_GEMINI_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.into());
        let model =
            non_blank(lookup("QUIZ_GEMINI_MODEL")).unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into());
        let tts_model = non_blank(lookup("QUIZ_GEMINI_TTS_MODEL"))
            .unwrap_or_else(|| DEFAULT_GEMINI_TTS_MODEL.into());
        Some(Self {
            base_url,
            api_key,
            model,
            tts_model,
        })
    }
}

/// Remote key-value store holding per-player level, points and feedback.
#[derive(Clone, Debug)]
pub struct RemoteStoreConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
}

impl RemoteStoreConfig {
    /// `None` when `QUIZ_REMOTE_DB_URL` is missing or blank.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(env_lookup)
    }

    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let base_url = non_blank(lookup("QUIZ_REMOTE_DB_URL"))?;
        Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: non_blank(lookup("QUIZ_REMOTE_AUTH_TOKEN")),
        })
    }
}

/// Email/password accounts on the Identity Toolkit REST API.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub base_url: String,
    pub api_key: String,
}

impl AuthConfig {
    /// `None` when `QUIZ_AUTH_API_KEY` is missing or blank.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(env_lookup)
    }

    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let api_key = non_blank(lookup("QUIZ_AUTH_API_KEY"))?;
        let base_url = non_blank(lookup("QUIZ_AUTH_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_AUTH_BASE_URL.into());
        Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[derive(Clone, Debug)]
pub struct ServicesConfig {
    pub gemini: Option<GeminiConfig>,
    pub remote: Option<RemoteStoreConfig>,
    pub auth: Option<AuthConfig>,
    /// Signed-in account; takes precedence over the device id.
    pub account_uid: Option<PlayerId>,
    pub auto_gen_interval: Duration,
}

impl ServicesConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let account_uid = non_blank(lookup("QUIZ_ACCOUNT_UID")).and_then(|raw| {
            raw.parse::<PlayerId>()
                .map_err(|e| tracing::warn!(error = %e, "ignoring QUIZ_ACCOUNT_UID"))
                .ok()
        });
        let auto_gen_secs = non_blank(lookup("QUIZ_AUTO_GEN_SECS"))
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_AUTO_GEN_SECS);

        Self {
            gemini: GeminiConfig::from_lookup(&lookup),
            remote: RemoteStoreConfig::from_lookup(&lookup),
            auth: AuthConfig::from_lookup(&lookup),
            account_uid,
            auto_gen_interval: Duration::from_secs(auto_gen_secs),
        }
    }

    /// Everything disabled; what tests and offline runs use.
    #[must_use]
    pub fn offline() -> Self {
        Self {
            gemini: None,
            remote: None,
            auth: None,
            account_uid: None,
            auto_gen_interval: Duration::from_secs(DEFAULT_AUTO_GEN_SECS),
        }
    }
}
