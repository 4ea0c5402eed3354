pub mod core;
pub mod dictionary;
pub mod hints;
pub mod lyrics;
pub mod persistence;
pub mod practice;
pub mod segmentation;
pub mod settings;
pub mod speech;

pub use crate::core::{
    PartOfSpeech,
    Token,
    UtsushiError,
};
pub use dictionary::DictType;
pub use hints::{
    BunsetsuGroup,
    HintComposer,
    HintView,
    StyleClass,
};
pub use practice::{
    CardView,
    CharSpan,
    InputOutcome,
    PracticeSession,
};
pub use segmentation::{
    SentenceSegmenter,
    TokenizerGateway,
};
pub use settings::Settings;
pub use speech::{
    SpeechPlayer,
    VoiceCatalog,
};
