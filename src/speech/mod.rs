pub mod catalog;
pub mod command;
pub mod player;
pub mod provider;

pub use catalog::{
    VoiceCatalog,
    VoiceOption,
    VoiceSelector,
};
pub use command::{
    CommandEngine,
    CommandProvider,
};
pub use player::SpeechPlayer;
pub use provider::{
    SpeechProvider,
    Utterance,
    Voice,
};
