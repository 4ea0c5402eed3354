use std::fmt;

/// Coarse part-of-speech taken from the analyzer's first feature column.
/// Accepts both UniDic and IPADIC category names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,           // 名詞
    Pronoun,        // 代名詞
    Verb,           // 動詞
    Adjective,      // 形容詞
    AdjectivalNoun, // 形状詞
    Adverb,         // 副詞
    Particle,       // 助詞
    Auxiliary,      // 助動詞
    Adnominal,      // 連体詞 (この, あの)
    Conjunction,    // 接続詞
    Interjection,   // 感動詞, フィラー
    Prefix,         // 接頭辞 / 接頭詞
    Suffix,         // 接尾辞
    Symbol,         // 記号, 補助記号
    Whitespace,     // 空白
    Other,
}

impl From<&str> for PartOfSpeech {
    fn from(value: &str) -> Self {
        match value {
            "名詞" => Self::Noun,
            "代名詞" => Self::Pronoun,
            "動詞" => Self::Verb,
            "形容詞" => Self::Adjective,
            "形状詞" => Self::AdjectivalNoun,
            "副詞" => Self::Adverb,
            "助詞" => Self::Particle,
            "助動詞" => Self::Auxiliary,
            "連体詞" => Self::Adnominal,
            "接続詞" => Self::Conjunction,
            "感動詞" | "フィラー" => Self::Interjection,
            "接頭辞" | "接頭詞" => Self::Prefix,
            "接尾辞" => Self::Suffix,
            "記号" | "補助記号" => Self::Symbol,
            "空白" => Self::Whitespace,
            _ => Self::Other,
        }
    }
}

impl PartOfSpeech {
    /// Particles and auxiliaries attach to the preceding content word.
    pub fn is_function_word(&self) -> bool {
        matches!(self, PartOfSpeech::Particle | PartOfSpeech::Auxiliary)
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let readable = match self {
            PartOfSpeech::Noun => "Noun",
            PartOfSpeech::Pronoun => "Pronoun",
            PartOfSpeech::Verb => "Verb",
            PartOfSpeech::Adjective => "Adjective",
            PartOfSpeech::AdjectivalNoun => "Adjectival Noun",
            PartOfSpeech::Adverb => "Adverb",
            PartOfSpeech::Particle => "Particle",
            PartOfSpeech::Auxiliary => "Auxiliary",
            PartOfSpeech::Adnominal => "Adnominal",
            PartOfSpeech::Conjunction => "Conjunction",
            PartOfSpeech::Interjection => "Interjection",
            PartOfSpeech::Prefix => "Prefix",
            PartOfSpeech::Suffix => "Suffix",
            PartOfSpeech::Symbol => "Symbol",
            PartOfSpeech::Whitespace => "Whitespace",
            PartOfSpeech::Other => "Other",
        };
        write!(f, "{}", readable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub surface: String,
    pub reading: Option<String>, // Katakana reading, None when the dictionary has none
    pub part_of_speech: PartOfSpeech,
}

impl Token {
    pub fn new(surface: &str, reading: Option<&str>, part_of_speech: PartOfSpeech) -> Self {
        Token {
            surface: surface.to_string(),
            reading: reading.map(|r| r.to_string()),
            part_of_speech,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.surface.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_of_speech_from_tags() {
        assert_eq!(PartOfSpeech::from("名詞"), PartOfSpeech::Noun);
        assert_eq!(PartOfSpeech::from("補助記号"), PartOfSpeech::Symbol);
        assert_eq!(PartOfSpeech::from("接頭詞"), PartOfSpeech::Prefix);
        assert_eq!(PartOfSpeech::from("*"), PartOfSpeech::Other);
        assert!(PartOfSpeech::Auxiliary.is_function_word());
        assert!(!PartOfSpeech::Verb.is_function_word());
    }

    #[test]
    fn test_blank_token() {
        assert!(Token::new("　", None, PartOfSpeech::Whitespace).is_blank());
        assert!(!Token::new("猫", Some("ネコ"), PartOfSpeech::Noun).is_blank());
    }
}
