use wana_kana::ConvertJapanese;

use crate::core::{
    PartOfSpeech,
    Token,
};

const SMALL_TSU: [char; 2] = ['っ', 'ッ'];

/// Latin rendering of one token, reading particles the way they are pronounced.
pub fn romanize(token: &Token) -> String {
    if token.part_of_speech == PartOfSpeech::Particle {
        match token.surface.as_str() {
            "は" => return "wa".to_string(),
            "へ" => return "e".to_string(),
            "を" => return "o".to_string(),
            _ => {}
        }
    }

    let reading = token.reading.as_deref().unwrap_or(&token.surface);

    // A trailing small tsu has no following mora to double, so repeat the last consonant
    if let Some(remainder) = reading.strip_suffix(SMALL_TSU) {
        let base = remainder.to_romaji();
        return match last_consonant(&base) {
            Some(consonant) => format!("{base}{consonant}"),
            None => base,
        };
    }

    reading.to_romaji()
}

fn last_consonant(romaji: &str) -> Option<char> {
    romaji.chars().rev().find(|c| c.is_ascii_alphabetic() && !"aeiouAEIOU".contains(*c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_exceptions_ignore_reading() {
        assert_eq!(romanize(&Token::new("は", Some("ハ"), PartOfSpeech::Particle)), "wa");
        assert_eq!(romanize(&Token::new("は", Some("ワ"), PartOfSpeech::Particle)), "wa");
        assert_eq!(romanize(&Token::new("を", Some("ヲ"), PartOfSpeech::Particle)), "o");
        assert_eq!(romanize(&Token::new("へ", Some("ヘ"), PartOfSpeech::Particle)), "e");
    }

    #[test]
    fn test_exceptions_only_apply_to_particles() {
        // 歯 read as は
        assert_eq!(romanize(&Token::new("歯", Some("ハ"), PartOfSpeech::Noun)), "ha");
        assert_eq!(romanize(&Token::new("は", Some("ハ"), PartOfSpeech::Noun)), "ha");
    }

    #[test]
    fn test_reading_and_surface_fallback() {
        assert_eq!(romanize(&Token::new("猫", Some("ネコ"), PartOfSpeech::Noun)), "neko");
        assert_eq!(romanize(&Token::new("すごい", None, PartOfSpeech::Adjective)), "sugoi");
    }

    #[test]
    fn test_trailing_small_tsu_doubles_consonant() {
        assert_eq!(romanize(&Token::new("だっ", Some("ダッ"), PartOfSpeech::Auxiliary)), "dad");
        assert_eq!(romanize(&Token::new("言っ", Some("イッ"), PartOfSpeech::Verb)), "i");
        assert_eq!(romanize(&Token::new("ぱっ", None, PartOfSpeech::Adverb)), "pap");
    }
}
