use std::{
    sync::{
        Arc,
        Mutex,
        MutexGuard,
    },
    time::Duration,
};

use tokio::task::JoinHandle;

use super::{
    catalog::VoiceCatalog,
    provider::{
        SpeechProvider,
        Utterance,
        Voice,
    },
};
use crate::settings::SpeechSettings;

// Keeps the audio session awake without being heard
const HEARTBEAT_TEXT: &str = "。";

#[derive(Debug, Clone, Copy)]
struct Prosody {
    rate: f32,
    pitch: f32,
}

/// Plays one utterance at a time: every `speak` interrupts the previous one.
pub struct SpeechPlayer {
    catalog: Arc<VoiceCatalog>,
    prosody: Prosody,
    debounce: Duration,
    heartbeat_interval: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
    heartbeat: Mutex<Option<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Selected voice, else the first catalog voice, else the first provider's default.
fn resolve(catalog: &VoiceCatalog) -> Option<(Arc<dyn SpeechProvider>, Option<Voice>)> {
    let voice = catalog.selected().or_else(|| catalog.voices().into_iter().next());
    if let Some(voice) = voice {
        if let Some(provider) = catalog.provider(&voice.provider_id) {
            return Some((provider.clone(), Some(voice)));
        }
    }
    catalog.providers().first().map(|provider| (provider.clone(), None))
}

async fn dispatch(catalog: &VoiceCatalog, prosody: Prosody, text: String, volume: f32) {
    let Some((provider, voice)) = resolve(catalog) else {
        tracing::warn!("No speech provider available");
        return;
    };

    let utterance = Utterance {
        text,
        voice,
        language: catalog.language().to_string(),
        rate: prosody.rate,
        pitch: prosody.pitch,
        volume,
    };

    tracing::debug!(
        provider = provider.id(),
        voice = ?utterance.voice.as_ref().map(|v| &v.name),
        volume,
        "Dispatching utterance"
    );
    if let Err(e) = provider.speak(utterance).await {
        tracing::warn!(provider = provider.id(), error = %e, "Playback failed");
    }
}

impl SpeechPlayer {
    pub fn new(catalog: Arc<VoiceCatalog>, settings: &SpeechSettings) -> Self {
        Self {
            catalog,
            prosody: Prosody { rate: settings.rate, pitch: settings.pitch },
            debounce: settings.debounce(),
            heartbeat_interval: settings.heartbeat_interval(),
            pending: Mutex::new(None),
            heartbeat: Mutex::new(None),
        }
    }

    pub fn catalog(&self) -> &Arc<VoiceCatalog> {
        &self.catalog
    }

    /// Stops the pending debounce timer and everything any provider is saying.
    pub fn cancel(&self) {
        if let Some(pending) = lock(&self.pending).take() {
            pending.abort();
        }
        for provider in self.catalog.providers() {
            provider.cancel();
        }
    }

    /// Interrupts current speech and plays `text` after the debounce delay.
    /// The voice is picked when the delay ends, not now.
    pub fn speak(&self, text: &str) {
        self.cancel();

        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let catalog = self.catalog.clone();
        let prosody = self.prosody;
        let debounce = self.debounce;
        let text = text.to_string();

        let task = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            dispatch(&catalog, prosody, text, 1.0).await;
        });
        *lock(&self.pending) = Some(task);
    }

    pub fn is_speaking(&self) -> bool {
        self.catalog.providers().iter().any(|provider| provider.is_speaking())
    }

    /// Starts the keep-alive loop. Later calls are no-ops while it runs.
    pub fn arm_heartbeat(self: &Arc<Self>) {
        let mut heartbeat = lock(&self.heartbeat);
        if heartbeat.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }

        let player = Arc::downgrade(self);
        let period = self.heartbeat_interval;
        *heartbeat = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(player) = player.upgrade() else {
                    break;
                };
                player.pulse().await;
            }
        }));
        tracing::debug!(?period, "Speech heartbeat armed");
    }

    async fn pulse(&self) {
        if self.is_speaking() {
            tracing::trace!("Heartbeat skipped while speaking");
            return;
        }
        dispatch(&self.catalog, self.prosody, HEARTBEAT_TEXT.to_string(), 0.0).await;
    }
}

impl Drop for SpeechPlayer {
    fn drop(&mut self) {
        for slot in [&self.pending, &self.heartbeat] {
            if let Some(task) = lock(slot).take() {
                task.abort();
            }
        }
    }
}
