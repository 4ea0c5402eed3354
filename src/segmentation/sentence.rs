use regex::Regex;

use crate::core::UtsushiError;

// A run of non-terminators, optionally closed by one terminator or closing bracket
const SENTENCE_PATTERN: &str = r"[^。！？!?\n]+[。！？!?」）]?";

pub const TERMINATORS: &[char] = &['。', '！', '？', '!', '?', '\n'];

/// Splits raw text into practice sentences on punctuation alone.
#[derive(Debug, Clone)]
pub struct SentenceSegmenter {
    pattern: Regex,
}

impl SentenceSegmenter {
    pub fn new() -> Result<Self, UtsushiError> {
        Ok(Self { pattern: Regex::new(SENTENCE_PATTERN)? })
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        self.pattern.find_iter(text).map(|m| m.as_str().to_string()).collect()
    }
}

/// Lyric pages are practiced line by line instead of by punctuation.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}
