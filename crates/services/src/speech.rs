use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lru::LruCache;
use quiz_core::model::catalog::is_known_voice;
use serde_json::json;

use crate::error::SpeechError;
use crate::gemini::{Content, GeminiClient, GenerateContentRequest};
use crate::retry::{RetryPolicy, retry};

/// Clips kept in memory; one quiz reads at most a few dozen texts.
pub const DEFAULT_SPEECH_CACHE_CAPACITY: usize = 128;

/// Turns text into base64-encoded PCM audio (24 kHz, mono, 16-bit).
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// # Errors
    ///
    /// Returns `SpeechError` when the audio cannot be produced.
    async fn synthesize(&self, text: &str, voice: &str) -> Result<String, SpeechError>;
}

#[derive(Clone)]
pub struct GeminiSpeechSynthesizer {
    client: GeminiClient,
}

impl GeminiSpeechSynthesizer {
    #[must_use]
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SpeechSynthesizer for GeminiSpeechSynthesizer {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<String, SpeechError> {
        let model = self
            .client
            .config()
            .map(|config| config.tts_model.clone())
            .ok_or(SpeechError::Disabled)?;

        let body = GenerateContentRequest {
            contents: vec![Content::user_text(text)],
            system_instruction: None,
            generation_config: Some(json!({
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": voice }
                    }
                }
            })),
        };

        let response = self.client.generate_content(&model, &body).await?;
        response
            .inline_data()
            .map(ToString::to_string)
            .ok_or(SpeechError::MissingAudio)
    }
}

/// Bounded LRU of synthesized clips keyed by `voice:text`.
pub struct SpeechCache {
    entries: Mutex<LruCache<String, String>>,
}

impl SpeechCache {
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    #[must_use]
    pub fn key(voice: &str, text: &str) -> String {
        format!("{voice}:{text}")
    }

    /// Cached clip; marks the entry as recently used.
    #[must_use]
    pub fn get(&self, voice: &str, text: &str) -> Option<String> {
        let mut entries = self.entries.lock().ok()?;
        entries.get(&Self::key(voice, text)).cloned()
    }

    pub fn put(&self, voice: &str, text: &str, audio: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(Self::key(voice, text), audio);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SpeechCache {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_SPEECH_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}

/// Read-aloud for questions and explanations, memoised per voice and text.
#[derive(Clone)]
pub struct SpeechService {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    cache: Arc<SpeechCache>,
    retry: RetryPolicy,
}

impl SpeechService {
    #[must_use]
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, cache: Arc<SpeechCache>) -> Self {
        Self {
            synthesizer,
            cache,
            retry: RetryPolicy::speech(),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Base64 PCM for `text` spoken by `voice`.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` for blank text, an unknown voice, or when every
    /// attempt fails.
    pub async fn speak(&self, text: &str, voice: &str) -> Result<String, SpeechError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SpeechError::EmptyText);
        }
        if !is_known_voice(voice) {
            return Err(SpeechError::UnknownVoice(voice.to_string()));
        }
        if let Some(audio) = self.cache.get(voice, text) {
            tracing::debug!(voice, "speech cache hit");
            return Ok(audio);
        }

        let audio = retry(&self.retry, "speech", || {
            self.synthesizer.synthesize(text, voice)
        })
        .await?;
        self.cache.put(voice, text, audio.clone());
        Ok(audio)
    }

    #[must_use]
    pub fn cache(&self) -> &SpeechCache {
        &self.cache
    }
}
