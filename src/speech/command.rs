use std::{
    process::Stdio,
    sync::{
        atomic::{
            AtomicUsize,
            Ordering,
        },
        Arc,
        RwLock,
    },
};

use async_trait::async_trait;
use tokio::{
    process::Command,
    sync::watch,
};

use super::provider::{
    SpeakingGuard,
    SpeechProvider,
    Utterance,
    Voice,
};
use crate::core::UtsushiError;

const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// Speech engines driven through their command-line front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandEngine {
    EspeakNg,
    MacSay,
}

impl CommandEngine {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "espeak-ng" => Some(CommandEngine::EspeakNg),
            "say" => Some(CommandEngine::MacSay),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            CommandEngine::EspeakNg => "espeak-ng",
            CommandEngine::MacSay => "say",
        }
    }

    fn program(&self) -> &'static str {
        self.id()
    }

    fn list_args(&self) -> &'static [&'static str] {
        match self {
            CommandEngine::EspeakNg => &["--voices"],
            CommandEngine::MacSay => &["-v", "?"],
        }
    }

    pub fn parse_voices(&self, output: &str) -> Vec<Voice> {
        match self {
            // Pty Language Age/Gender VoiceName File Other Languages
            CommandEngine::EspeakNg => output
                .lines()
                .skip(1)
                .filter_map(|line| {
                    let columns: Vec<&str> = line.split_whitespace().collect();
                    match columns.as_slice() {
                        [_, language, _, name, ..] => Some(Voice::new(name, language, self.id())),
                        _ => None,
                    }
                })
                .collect(),
            // "Kyoko               ja_JP    # こんにちは、私の名前はKyokoです。"
            CommandEngine::MacSay => output
                .lines()
                .filter_map(|line| {
                    let described = line.split('#').next()?.trim_end();
                    let (name, language) = described.rsplit_once(char::is_whitespace)?;
                    let name = name.trim();
                    (!name.is_empty()).then(|| Voice::new(name, language, self.id()))
                })
                .collect(),
        }
    }

    pub fn speak_args(&self, utterance: &Utterance) -> Vec<String> {
        let words_per_minute = (BASE_WORDS_PER_MINUTE * utterance.rate).round().max(80.0);
        let volume = utterance.volume.clamp(0.0, 1.0);

        match self {
            CommandEngine::EspeakNg => {
                let voice = utterance
                    .voice
                    .as_ref()
                    .map(|v| v.language.clone())
                    .unwrap_or_else(|| utterance.language.clone());
                vec![
                    "-v".to_string(),
                    voice,
                    "-s".to_string(),
                    format!("{}", words_per_minute as u32),
                    "-p".to_string(),
                    format!("{}", (50.0 * utterance.pitch).clamp(0.0, 99.0) as u32),
                    "-a".to_string(),
                    format!("{}", (100.0 * volume) as u32),
                    "--".to_string(),
                    utterance.text.clone(),
                ]
            }
            CommandEngine::MacSay => {
                let mut args = Vec::new();
                if let Some(voice) = &utterance.voice {
                    args.push("-v".to_string());
                    args.push(voice.name.clone());
                }
                args.push("-r".to_string());
                args.push(format!("{}", words_per_minute as u32));
                // Embedded speech command; say has no portable volume flag
                let text = if volume < 1.0 {
                    format!("[[volm {:.2}]] {}", volume, utterance.text)
                } else {
                    utterance.text.clone()
                };
                args.push("--".to_string());
                args.push(text);
                args
            }
        }
    }
}

/// Spawns one engine process per utterance and kills it on cancel.
pub struct CommandProvider {
    engine: CommandEngine,
    voices: RwLock<Vec<Voice>>,
    changed: watch::Sender<u64>,
    cancel_signal: watch::Sender<u64>,
    speaking: AtomicUsize,
}

impl CommandProvider {
    /// Creates the provider and lists its voices in the background.
    pub fn spawn(engine: CommandEngine) -> Arc<Self> {
        let provider = Arc::new(Self {
            engine,
            voices: RwLock::new(Vec::new()),
            changed: watch::Sender::new(0),
            cancel_signal: watch::Sender::new(0),
            speaking: AtomicUsize::new(0),
        });

        let listing = provider.clone();
        tokio::spawn(async move {
            listing.refresh_voices().await;
        });

        provider
    }

    pub async fn refresh_voices(&self) {
        let output = Command::new(self.engine.program())
            .args(self.engine.list_args())
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await;

        let voices = match output {
            Ok(output) if output.status.success() => {
                self.engine.parse_voices(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(output) => {
                tracing::debug!(engine = self.engine.id(), status = %output.status, "Voice listing failed");
                Vec::new()
            }
            Err(e) => {
                tracing::debug!(engine = self.engine.id(), error = %e, "Speech engine unavailable");
                Vec::new()
            }
        };

        tracing::debug!(engine = self.engine.id(), voices = voices.len(), "Voices listed");
        if let Ok(mut slot) = self.voices.write() {
            *slot = voices;
        }
        self.changed.send_modify(|generation| *generation += 1);
    }
}

#[async_trait]
impl SpeechProvider for CommandProvider {
    fn id(&self) -> &str {
        self.engine.id()
    }

    fn voices(&self) -> Vec<Voice> {
        self.voices.read().map(|voices| voices.clone()).unwrap_or_default()
    }

    fn voices_changed(&self) -> Option<watch::Receiver<u64>> {
        Some(self.changed.subscribe())
    }

    async fn speak(&self, utterance: Utterance) -> Result<(), UtsushiError> {
        let mut cancelled = self.cancel_signal.subscribe();

        let mut child = Command::new(self.engine.program())
            .args(self.engine.speak_args(&utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| UtsushiError::Playback(format!("{}: {}", self.engine.id(), e)))?;

        let _speaking = SpeakingGuard::new(&self.speaking);

        tokio::select! {
            status = child.wait() => {
                let status = status?;
                if status.success() {
                    Ok(())
                } else {
                    Err(UtsushiError::Playback(format!("{} exited with {}", self.engine.id(), status)))
                }
            }
            _ = cancelled.changed() => {
                child.kill().await?;
                Ok(())
            }
        }
    }

    fn cancel(&self) {
        self.cancel_signal.send_modify(|generation| *generation += 1);
    }

    fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utterance(text: &str, voice: Option<Voice>, volume: f32) -> Utterance {
        Utterance {
            text: text.to_string(),
            voice,
            language: "ja-JP".to_string(),
            rate: 1.0,
            pitch: 1.0,
            volume,
        }
    }

    #[test]
    fn test_parse_espeak_voices() {
        let output = "Pty Language       Age/Gender VoiceName          File                 Other Languages\n \
                      5  af              --/M      Afrikaans          gmw/af\n \
                      5  ja              --/M      Japanese           jpx/ja\n";
        let voices = CommandEngine::EspeakNg.parse_voices(output);
        assert_eq!(voices.len(), 2);
        assert_eq!(voices[1], Voice::new("Japanese", "ja", "espeak-ng"));
    }

    #[test]
    fn test_parse_say_voices() {
        let output = "Bad News            en_US    # The light you see at the end of the tunnel.\n\
                      Kyoko               ja_JP    # こんにちは、私の名前はKyokoです。\n\
                      \n";
        let voices = CommandEngine::MacSay.parse_voices(output);
        assert_eq!(
            voices,
            vec![Voice::new("Bad News", "en_US", "say"), Voice::new("Kyoko", "ja_JP", "say")]
        );
    }

    #[test]
    fn test_speak_args() {
        let silent = CommandEngine::EspeakNg.speak_args(&utterance("。", None, 0.0));
        assert_eq!(silent, vec!["-v", "ja-JP", "-s", "175", "-p", "50", "-a", "0", "--", "。"]);

        let kyoko = Some(Voice::new("Kyoko", "ja_JP", "say"));
        let args = CommandEngine::MacSay.speak_args(&utterance("猫", kyoko, 1.0));
        assert_eq!(args, vec!["-v", "Kyoko", "-r", "175", "--", "猫"]);
    }

    #[test]
    fn test_engine_ids_round_trip() {
        for engine in [CommandEngine::EspeakNg, CommandEngine::MacSay] {
            assert_eq!(CommandEngine::from_id(engine.id()), Some(engine));
        }
        assert_eq!(CommandEngine::from_id("festival"), None);
    }
}
