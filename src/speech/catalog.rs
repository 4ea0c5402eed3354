use std::{
    collections::HashSet,
    sync::{
        Arc,
        RwLock,
        RwLockReadGuard,
        RwLockWriteGuard,
    },
    time::Duration,
};

use futures::future::join_all;
use tokio::sync::watch;

use super::provider::{
    SpeechProvider,
    Voice,
};
use crate::{
    core::UtsushiError,
    persistence::KeyValueStore,
    settings::SpeechSettings,
};

pub const SELECTED_VOICE_KEY: &str = "utsushi.selectedVoice";

const NO_VOICES_PLACEHOLDER: &str = "No Japanese voices available";

// Joke and effect voices shipped with macOS; unusable for practice
const NOVELTY_VOICES: &[&str] = &[
    "Albert",
    "Bad News",
    "Bahh",
    "Bells",
    "Boing",
    "Bubbles",
    "Cellos",
    "Deranged",
    "Fred",
    "Good News",
    "Hysterical",
    "Jester",
    "Junior",
    "Kathy",
    "Organ",
    "Pipe Organ",
    "Ralph",
    "Superstar",
    "Trinoids",
    "Whisper",
    "Wobble",
    "Zarvox",
];

fn is_novelty(voice: &Voice) -> bool {
    let base = voice.name.split(" (").next().unwrap_or(&voice.name);
    NOVELTY_VOICES.contains(&base)
}

/// Keeps target-language voices, first provider wins on a name clash.
pub fn merge_voices(per_provider: Vec<Vec<Voice>>, language: &str) -> Vec<Voice> {
    let mut seen = HashSet::new();
    per_provider
        .into_iter()
        .flatten()
        .filter(|voice| voice.speaks(language) && !is_novelty(voice))
        .filter(|voice| seen.insert(voice.name.clone()))
        .collect()
}

async fn next_change(receiver: &mut Option<watch::Receiver<u64>>) {
    if let Some(receiver) = receiver {
        if receiver.changed().await.is_ok() {
            return;
        }
    }
    // Provider never announces (or stopped); only the poll can finish discovery
    std::future::pending::<()>().await
}

/// Waits until `provider` reports voices, through its change notification or
/// a poll, and gives up after `timeout` with whatever it has.
pub async fn discover(
    provider: &dyn SpeechProvider,
    timeout: Duration,
    poll: Duration,
) -> Vec<Voice> {
    let mut changes = provider.voices_changed();

    let voices = provider.voices();
    if !voices.is_empty() {
        return voices;
    }

    let populated = async {
        let mut ticker = tokio::time::interval(poll);
        ticker.tick().await;
        loop {
            // An announcement is final even when the list stayed empty
            let announced = tokio::select! {
                _ = next_change(&mut changes) => true,
                _ = ticker.tick() => false,
            };
            if announced || !provider.voices().is_empty() {
                break;
            }
        }
    };

    if tokio::time::timeout(timeout, populated).await.is_err() {
        tracing::debug!(provider = provider.id(), ?timeout, "Voice discovery timed out");
    }
    provider.voices()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceOption {
    pub name: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceSelector {
    Disabled { placeholder: String },
    Options { options: Vec<VoiceOption>, selected: Option<String> },
}

#[derive(Debug, Default)]
struct CatalogState {
    voices: Vec<Voice>,
    selected: Option<String>,
}

/// Voices gathered from every provider plus the user's current choice.
pub struct VoiceCatalog {
    providers: Vec<Arc<dyn SpeechProvider>>,
    store: Arc<dyn KeyValueStore>,
    language: String,
    discovery_timeout: Duration,
    discovery_poll: Duration,
    state: RwLock<CatalogState>,
}

impl VoiceCatalog {
    /// `providers` are in priority order.
    pub fn new(
        providers: Vec<Arc<dyn SpeechProvider>>,
        store: Arc<dyn KeyValueStore>,
        settings: &SpeechSettings,
    ) -> Self {
        Self {
            providers,
            store,
            language: settings.language.clone(),
            discovery_timeout: settings.discovery_timeout(),
            discovery_poll: settings.discovery_poll(),
            state: RwLock::new(CatalogState::default()),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Rediscovers every provider concurrently and rebuilds the catalog.
    pub async fn load_voices(&self) -> Vec<Voice> {
        let discoveries = self.providers.iter().map(|provider| {
            discover(provider.as_ref(), self.discovery_timeout, self.discovery_poll)
        });
        let voices = merge_voices(join_all(discoveries).await, &self.language);

        let stored = self.store.get(SELECTED_VOICE_KEY);
        let selected = stored
            .filter(|name| voices.iter().any(|voice| &voice.name == name))
            .or_else(|| voices.first().map(|voice| voice.name.clone()));

        tracing::info!(voices = voices.len(), selected = ?selected, "Voice catalog loaded");

        let mut state = self.write_state();
        state.voices = voices.clone();
        state.selected = selected;
        voices
    }

    pub fn voices(&self) -> Vec<Voice> {
        self.read_state().voices.clone()
    }

    pub fn selected(&self) -> Option<Voice> {
        let state = self.read_state();
        let name = state.selected.as_ref()?;
        state.voices.iter().find(|voice| &voice.name == name).cloned()
    }

    /// Makes `name` the current voice and persists it.
    pub fn select(&self, name: &str) -> Result<Voice, UtsushiError> {
        let voice = self
            .read_state()
            .voices
            .iter()
            .find(|voice| voice.name == name)
            .cloned()
            .ok_or_else(|| UtsushiError::UnknownVoice(name.to_string()))?;

        self.write_state().selected = Some(voice.name.clone());
        self.store.set(SELECTED_VOICE_KEY, &voice.name)?;
        tracing::debug!(voice = %voice.name, "Voice selected");
        Ok(voice)
    }

    pub fn providers(&self) -> &[Arc<dyn SpeechProvider>] {
        &self.providers
    }

    pub fn provider(&self, id: &str) -> Option<&Arc<dyn SpeechProvider>> {
        self.providers.iter().find(|provider| provider.id() == id)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn selector(&self) -> VoiceSelector {
        let state = self.read_state();
        if state.voices.is_empty() {
            return VoiceSelector::Disabled { placeholder: NO_VOICES_PLACEHOLDER.to_string() };
        }

        let options = state
            .voices
            .iter()
            .map(|voice| VoiceOption {
                name: voice.name.clone(),
                label: format!("{} ({})", voice.name, voice.provider_id),
            })
            .collect();

        VoiceSelector::Options { options, selected: state.selected.clone() }
    }
}
