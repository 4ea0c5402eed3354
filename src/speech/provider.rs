use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};

use async_trait::async_trait;
use serde::{
    Deserialize,
    Serialize,
};
use tokio::sync::watch;

use crate::core::UtsushiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    pub language: String, // BCP 47 style tag, e.g. "ja-JP"; "ja_JP" is accepted too
    pub provider_id: String,
}

impl Voice {
    pub fn new(name: &str, language: &str, provider_id: &str) -> Self {
        Self {
            name: name.to_string(),
            language: language.to_string(),
            provider_id: provider_id.to_string(),
        }
    }

    /// Compares primary language subtags, so "ja_JP" matches a "ja-JP" target.
    pub fn speaks(&self, target: &str) -> bool {
        primary_subtag(&self.language) == primary_subtag(target)
    }
}

fn primary_subtag(tag: &str) -> String {
    tag.split(['-', '_']).next().unwrap_or_default().to_ascii_lowercase()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: Option<Voice>, // None uses the provider's default voice
    pub language: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32, // 0.0 (silent) ..= 1.0
}

/// A speech engine that can list voices and speak one utterance at a time.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    fn id(&self) -> &str;

    /// Voices known right now. Providers may fill this in some time after construction.
    fn voices(&self) -> Vec<Voice>;

    /// Fires whenever the voice list changes. `None` when the provider never announces.
    fn voices_changed(&self) -> Option<watch::Receiver<u64>>;

    /// Resolves when the utterance finished or was cancelled.
    async fn speak(&self, utterance: Utterance) -> Result<(), UtsushiError>;

    /// Stops every in-flight utterance of this provider.
    fn cancel(&self);

    fn is_speaking(&self) -> bool;
}

/// Counts an utterance as speaking for as long as the guard lives, including
/// when the speaking future is dropped mid-way.
pub(crate) struct SpeakingGuard<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> SpeakingGuard<'a> {
    pub(crate) fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for SpeakingGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{
        sync::{
            Arc,
            Mutex,
        },
        time::Duration,
    };

    use super::*;

    /// Records every utterance; each one "plays" for `play_for` unless cancelled.
    pub struct MockProvider {
        id: String,
        voices: Mutex<Vec<Voice>>,
        changed: watch::Sender<u64>,
        announces: bool,
        play_for: Duration,
        fail: bool,
        cancel_signal: watch::Sender<u64>,
        speaking: AtomicUsize,
        pub spoken: Mutex<Vec<Utterance>>,
        pub cancels: AtomicUsize,
    }

    impl MockProvider {
        pub fn new(id: &str, names: &[&str]) -> Self {
            Self {
                id: id.to_string(),
                voices: Mutex::new(names.iter().map(|n| Voice::new(n, "ja-JP", id)).collect()),
                changed: watch::Sender::new(0),
                announces: true,
                play_for: Duration::ZERO,
                fail: false,
                cancel_signal: watch::Sender::new(0),
                speaking: AtomicUsize::new(0),
                spoken: Mutex::new(Vec::new()),
                cancels: AtomicUsize::new(0),
            }
        }

        pub fn with_voices(id: &str, voices: Vec<Voice>) -> Self {
            let provider = Self::new(id, &[]);
            *provider.voices.lock().unwrap() = voices;
            provider
        }

        pub fn silent_about_changes(mut self) -> Self {
            self.announces = false;
            self
        }

        pub fn playing_for(mut self, duration: Duration) -> Self {
            self.play_for = duration;
            self
        }

        pub fn failing(mut self) -> Self {
            self.fail = true;
            self
        }

        pub fn populate(&self, names: &[&str]) {
            *self.voices.lock().unwrap() =
                names.iter().map(|n| Voice::new(n, "ja-JP", &self.id)).collect();
            self.changed.send_modify(|generation| *generation += 1);
        }

        /// Fills the voice list after `delay`, like an engine warming up.
        pub fn populate_later(self: &Arc<Self>, names: &'static [&'static str], delay: Duration) {
            let provider = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                provider.populate(names);
            });
        }

        pub fn spoken_texts(&self) -> Vec<String> {
            self.spoken.lock().unwrap().iter().map(|u| u.text.clone()).collect()
        }
    }

    #[async_trait]
    impl SpeechProvider for MockProvider {
        fn id(&self) -> &str {
            &self.id
        }

        fn voices(&self) -> Vec<Voice> {
            self.voices.lock().unwrap().clone()
        }

        fn voices_changed(&self) -> Option<watch::Receiver<u64>> {
            self.announces.then(|| self.changed.subscribe())
        }

        async fn speak(&self, utterance: Utterance) -> Result<(), UtsushiError> {
            self.spoken.lock().unwrap().push(utterance);
            if self.fail {
                return Err(UtsushiError::Playback("engine error".to_string()));
            }

            let mut cancelled = self.cancel_signal.subscribe();
            let _speaking = SpeakingGuard::new(&self.speaking);
            tokio::select! {
                _ = tokio::time::sleep(self.play_for) => {}
                _ = cancelled.changed() => {}
            }
            Ok(())
        }

        fn cancel(&self) {
            self.cancels.fetch_add(1, Ordering::SeqCst);
            self.cancel_signal.send_modify(|generation| *generation += 1);
        }

        fn is_speaking(&self) -> bool {
            self.speaking.load(Ordering::SeqCst) > 0
        }
    }

    #[test]
    fn test_language_match_uses_primary_subtag() {
        assert!(Voice::new("Kyoko", "ja_JP", "say").speaks("ja-JP"));
        assert!(Voice::new("Japanese", "ja", "espeak-ng").speaks("ja-JP"));
        assert!(!Voice::new("Alex", "en-US", "say").speaks("ja-JP"));
    }
}
