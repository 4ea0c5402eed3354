pub mod errors;
pub mod http;
pub mod models;

pub use errors::UtsushiError;
pub use models::{
    PartOfSpeech,
    Token,
};
