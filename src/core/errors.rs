use thiserror::Error;

#[derive(Error, Debug)]
pub enum UtsushiError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("Vibrato error: {0}")]
    Vibrato(Box<vibrato::errors::VibratoError>),

    #[error("Tokenizer failed to initialize: {0}")]
    Initialization(String),

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("No card at index {0}")]
    NoSuchCard(usize),

    #[error("Card {0} is locked")]
    CardLocked(usize),

    #[error("Unknown voice: {0}")]
    UnknownVoice(String),

    #[error("Lyrics unavailable: {0}")]
    Lyrics(String),

    #[error("UtsushiError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for UtsushiError {
    fn from(error: std::io::Error) -> Self {
        UtsushiError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for UtsushiError {
    fn from(error: reqwest::Error) -> Self {
        UtsushiError::Reqwest(Box::new(error))
    }
}

impl From<vibrato::errors::VibratoError> for UtsushiError {
    fn from(error: vibrato::errors::VibratoError) -> Self {
        UtsushiError::Vibrato(Box::new(error))
    }
}
