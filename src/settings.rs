use serde::{Deserialize, Serialize};
use std::env;

// Environment variable names for the translation backend. These are read
// fresh on each call so a key or model change takes effect without a restart.
const API_KEY_ENV: &str = "PARROT_API_KEY";
const MODEL_ENV: &str = "PARROT_MODEL";
const BASE_URL_ENV: &str = "PARROT_API_BASE_URL";

pub const DEFAULT_MODEL: &str = "claude-3-7-sonnet-20250219";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Playback parameters passed through to the speech engine.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct VoiceTuning {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for VoiceTuning {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// Quiescence window after the last transcript change before a
    /// translation attempt fires.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Speak newly translated content automatically.
    #[serde(default = "default_auto_speak")]
    pub auto_speak: bool,
    /// Recognition language tag for the speech-to-text engine.
    #[serde(default = "default_source_language_tag")]
    pub source_language_tag: String,
    /// Target language code, resolved against the language table.
    #[serde(default = "default_target_language")]
    pub target_language: String,
    #[serde(default)]
    pub voice: VoiceTuning,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            auto_speak: default_auto_speak(),
            source_language_tag: default_source_language_tag(),
            target_language: default_target_language(),
            voice: VoiceTuning::default(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    1500
}

fn default_auto_speak() -> bool {
    true
}

fn default_source_language_tag() -> String {
    "pt-BR".to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

/// API key for the translation backend, if configured.
pub fn api_key() -> Option<String> {
    match env::var(API_KEY_ENV) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(_) => None,
    }
}

/// Model identifier for the translation backend.
pub fn model() -> String {
    match env::var(MODEL_ENV) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => DEFAULT_MODEL.to_string(),
    }
}

/// Base URL for the translation backend. The override exists so the client
/// can be pointed at a local stand-in server.
pub fn base_url() -> String {
    match env::var(BASE_URL_ENV) {
        Ok(value) if !value.trim().is_empty() => value.trim().trim_end_matches('/').to_string(),
        _ => DEFAULT_BASE_URL.to_string(),
    }
}
