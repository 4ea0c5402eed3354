use std::fmt;

use super::romanize::romanize;
use crate::core::{
    PartOfSpeech,
    Token,
};

/// Display category of a phrase group, keyed on its first token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleClass {
    Noun,
    Verb,
    Particle,
    Auxiliary,
    Adjective,
    Adverb,
    Symbol,
    Other,
}

impl From<PartOfSpeech> for StyleClass {
    fn from(pos: PartOfSpeech) -> Self {
        match pos {
            // IPADIC files pronouns and na-adjective stems under 名詞
            PartOfSpeech::Noun | PartOfSpeech::Pronoun | PartOfSpeech::AdjectivalNoun => {
                StyleClass::Noun
            }
            PartOfSpeech::Verb => StyleClass::Verb,
            PartOfSpeech::Particle => StyleClass::Particle,
            PartOfSpeech::Auxiliary => StyleClass::Auxiliary,
            PartOfSpeech::Adjective => StyleClass::Adjective,
            PartOfSpeech::Adverb => StyleClass::Adverb,
            PartOfSpeech::Symbol => StyleClass::Symbol,
            _ => StyleClass::Other,
        }
    }
}

impl StyleClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleClass::Noun => "noun",
            StyleClass::Verb => "verb",
            StyleClass::Particle => "particle",
            StyleClass::Auxiliary => "auxiliary",
            StyleClass::Adjective => "adjective",
            StyleClass::Adverb => "adverb",
            StyleClass::Symbol => "symbol",
            StyleClass::Other => "other",
        }
    }
}

impl fmt::Display for StyleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One content word and the particles/auxiliaries attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct BunsetsuGroup {
    pub tokens: Vec<Token>,
    pub surface: String,
    pub romanized: String,
    pub style: StyleClass,
}

impl BunsetsuGroup {
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        let surface = tokens.iter().map(|t| t.surface.as_str()).collect::<Vec<_>>().join(" ");
        let romanized = tokens.iter().map(romanize).collect::<Vec<_>>().join(" ");
        let style = tokens
            .first()
            .map(|t| StyleClass::from(t.part_of_speech))
            .unwrap_or(StyleClass::Other);

        Self { tokens, surface, romanized, style }
    }

    /// Text handed to speech when the group is activated.
    pub fn speech_text(&self) -> String {
        self.surface.chars().filter(|c| *c != ' ').collect()
    }
}

/// Left fold: content words open a group, function words join the open one.
pub fn group_tokens(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    let mut groups: Vec<Vec<Token>> = Vec::new();

    for token in tokens.into_iter().filter(|t| !t.is_blank()) {
        match groups.last_mut() {
            Some(open) if token.part_of_speech.is_function_word() => open.push(token),
            _ => groups.push(vec![token]),
        }
    }

    groups
}

pub fn build_groups(tokens: Vec<Token>) -> Vec<BunsetsuGroup> {
    group_tokens(tokens).into_iter().map(BunsetsuGroup::from_tokens).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surfaces(groups: &[Vec<Token>]) -> Vec<Vec<&str>> {
        groups.iter().map(|g| g.iter().map(|t| t.surface.as_str()).collect()).collect()
    }

    #[test]
    fn test_content_word_opens_group() {
        let tokens = vec![
            Token::new("猫", Some("ネコ"), PartOfSpeech::Noun),
            Token::new("が", Some("ガ"), PartOfSpeech::Particle),
            Token::new("寝", Some("ネ"), PartOfSpeech::Verb),
            Token::new("た", Some("タ"), PartOfSpeech::Auxiliary),
        ];
        assert_eq!(surfaces(&group_tokens(tokens)), vec![vec!["猫", "が"], vec!["寝", "た"]]);
    }

    #[test]
    fn test_leading_function_word_and_whitespace() {
        let tokens = vec![
            Token::new("よ", Some("ヨ"), PartOfSpeech::Particle),
            Token::new("ね", Some("ネ"), PartOfSpeech::Particle),
            Token::new("　", None, PartOfSpeech::Whitespace),
            Token::new("今日", Some("キョウ"), PartOfSpeech::Noun),
            Token::new(" ", None, PartOfSpeech::Symbol),
            Token::new("は", Some("ハ"), PartOfSpeech::Particle),
            Token::new("。", None, PartOfSpeech::Symbol),
        ];
        assert_eq!(
            surfaces(&group_tokens(tokens)),
            vec![vec!["よ", "ね"], vec!["今日", "は"], vec!["。"]]
        );
    }

    #[test]
    fn test_group_fields() {
        let groups = build_groups(vec![
            Token::new("猫", Some("ネコ"), PartOfSpeech::Noun),
            Token::new("が", Some("ガ"), PartOfSpeech::Particle),
            Token::new("ああ", Some("アア"), PartOfSpeech::Interjection),
        ]);

        assert_eq!(groups[0].surface, "猫 が");
        assert_eq!(groups[0].romanized, "neko ga");
        assert_eq!(groups[0].style, StyleClass::Noun);
        assert_eq!(groups[0].speech_text(), "猫が");
        assert_eq!(groups[1].style.as_str(), "other");
    }

    #[test]
    fn test_style_table_defaults_to_other() {
        for pos in [
            PartOfSpeech::Interjection,
            PartOfSpeech::Adnominal,
            PartOfSpeech::Conjunction,
            PartOfSpeech::Prefix,
        ] {
            assert_eq!(StyleClass::from(pos), StyleClass::Other);
        }
        assert_eq!(StyleClass::from(PartOfSpeech::Symbol).as_str(), "symbol");
    }
}
