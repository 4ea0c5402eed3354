pub mod sentence;

pub mod token_models;

pub mod tokenizer;

pub use sentence::SentenceSegmenter;
pub use tokenizer::{
    MorphologicalAnalyzer,
    SharedAnalyzer,
    TokenizerGateway,
    VibratoAnalyzer,
};
