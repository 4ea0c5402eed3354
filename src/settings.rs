use std::{
    path::PathBuf,
    time::Duration,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::UtsushiError,
    dictionary::DictType,
    persistence::{
        get_data_file_path,
        load_json_or_default,
        save_json,
    },
};

const SETTINGS_FILE: &str = "settings.json";
const GENIUS_TOKEN_ENV: &str = "GENIUS_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeechSettings {
    pub language: String,
    pub rate: f32,
    pub pitch: f32,
    pub debounce_ms: u64,
    pub heartbeat_interval_secs: u64,
    pub discovery_timeout_ms: u64,
    pub discovery_poll_ms: u64,
    pub providers: Vec<String>, // Provider ids in priority order
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            language: "ja-JP".to_string(),
            rate: 0.9,
            pitch: 1.0,
            debounce_ms: 150,
            heartbeat_interval_secs: 10,
            discovery_timeout_ms: 3000,
            discovery_poll_ms: 100,
            providers: vec!["say".to_string(), "espeak-ng".to_string()],
        }
    }
}

impl SpeechSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs.max(1))
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_timeout_ms)
    }

    pub fn discovery_poll(&self) -> Duration {
        Duration::from_millis(self.discovery_poll_ms.max(1))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub dictionary: DictType,
    pub dictionary_path: Option<PathBuf>, // Prebuilt system.dic(.zst); skips the download
    pub speech: SpeechSettings,
    pub genius_token: Option<String>,
}

impl Settings {
    pub fn path() -> PathBuf {
        get_data_file_path(SETTINGS_FILE)
    }

    pub fn load() -> Self {
        let mut settings: Settings = load_json_or_default(&Self::path());
        if let Ok(token) = std::env::var(GENIUS_TOKEN_ENV) {
            if !token.trim().is_empty() {
                settings.genius_token = Some(token);
            }
        }
        settings
    }

    pub fn save(&self) -> Result<(), UtsushiError> {
        save_json(self, &Self::path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "speech": { "rate": 1.2 } }"#).unwrap();
        assert_eq!(settings.dictionary, DictType::Unidic);
        assert_eq!(settings.speech.rate, 1.2);
        assert_eq!(settings.speech.language, "ja-JP");
        assert_eq!(settings.speech.debounce(), Duration::from_millis(150));
    }
}
