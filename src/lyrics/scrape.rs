use regex::{
    Captures,
    Regex,
};

use crate::{
    core::UtsushiError,
    segmentation::sentence::split_lines,
};

const CONTAINER_PATTERN: &str = r#"<div[^>]*data-lyrics-container="true"[^>]*>"#;
const LEGACY_PATTERN: &str = r#"<div[^>]*class="lyrics"[^>]*>"#;

/// Pulls lyric lines out of a song page's HTML.
#[derive(Debug, Clone)]
pub struct LyricsScraper {
    container: Regex,
    legacy: Regex,
    div_tag: Regex,
    line_break: Regex,
    tag: Regex,
    entity: Regex,
}

impl LyricsScraper {
    pub fn new() -> Result<Self, UtsushiError> {
        Ok(Self {
            container: Regex::new(CONTAINER_PATTERN)?,
            legacy: Regex::new(LEGACY_PATTERN)?,
            div_tag: Regex::new(r"</?div\b[^>]*>")?,
            line_break: Regex::new(r"<br\s*/?>")?,
            tag: Regex::new(r"<[^>]+>")?,
            entity: Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos|nbsp);")?,
        })
    }

    /// Non-blank trimmed lines of every lyric container, in page order.
    pub fn extract_lines(&self, html: &str) -> Result<Vec<String>, UtsushiError> {
        let mut blocks = self.blocks(&self.container, html);
        if blocks.is_empty() {
            blocks = self.blocks(&self.legacy, html);
        }
        if blocks.is_empty() {
            return Err(UtsushiError::Lyrics("no lyrics found on the song page".to_string()));
        }

        let text = blocks.iter().map(|block| self.to_text(block)).collect::<Vec<_>>().join("\n");
        let lines = split_lines(&text);
        if lines.is_empty() {
            return Err(UtsushiError::Lyrics("the lyrics on the song page are empty".to_string()));
        }
        Ok(lines)
    }

    /// Inner HTML of each div opened by `opening`, matching nested divs.
    fn blocks<'a>(&self, opening: &Regex, html: &'a str) -> Vec<&'a str> {
        let mut blocks = Vec::new();
        let mut resume = 0;

        for open in opening.find_iter(html) {
            if open.start() < resume {
                continue; // Nested inside the previous block
            }

            let mut depth = 1;
            for tag in self.div_tag.find_iter(&html[open.end()..]) {
                depth += if tag.as_str().starts_with("</") { -1 } else { 1 };
                if depth == 0 {
                    let close = open.end() + tag.start();
                    blocks.push(&html[open.end()..close]);
                    resume = open.end() + tag.end();
                    break;
                }
            }
        }

        blocks
    }

    fn to_text(&self, block: &str) -> String {
        let with_breaks = self.line_break.replace_all(block, "\n");
        let stripped = self.tag.replace_all(&with_breaks, "");
        self.entity.replace_all(&stripped, |caps: &Captures| decode_entity(&caps[1])).into_owned()
    }
}

fn decode_entity(name: &str) -> String {
    let decoded = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = match name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => name.strip_prefix('#').and_then(|dec| dec.parse().ok()),
            };
            code.and_then(char::from_u32)
        }
    };

    decoded.map(String::from).unwrap_or_else(|| format!("&{name};"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_lines_from_containers() {
        let html = r#"
            <html><body>
            <div class="Header">Song</div>
            <div data-lyrics-container="true" class="Lyrics__Container">
                [Verse 1]<br/>夜に<a href="/a"><span>駆ける</span></a><br>
                <div class="Annotation">沈むように</div>溶けてゆくように<br/>
            </div>
            <div class="Ad">ad</div>
            <div data-lyrics-container="true">二人だけの空が広がる夜に<br/>&quot;さよなら&quot; &amp; &#12354;</div>
            </body></html>
        "#;

        let scraper = LyricsScraper::new().unwrap();
        assert_eq!(
            scraper.extract_lines(html).unwrap(),
            vec![
                "[Verse 1]",
                "夜に駆ける",
                "沈むように溶けてゆくように",
                "二人だけの空が広がる夜に",
                "\"さよなら\" & あ",
            ]
        );
    }

    #[test]
    fn test_legacy_lyrics_block() {
        let html = r#"<div class="lyrics"><p>一行目<br>二行目</p></div>"#;
        let scraper = LyricsScraper::new().unwrap();
        assert_eq!(scraper.extract_lines(html).unwrap(), vec!["一行目", "二行目"]);
    }

    #[test]
    fn test_missing_lyrics_is_an_error() {
        let scraper = LyricsScraper::new().unwrap();
        let result = scraper.extract_lines("<html><div>nothing here</div></html>");
        assert!(matches!(result, Err(UtsushiError::Lyrics(_))));

        let empty = scraper.extract_lines(r#"<div data-lyrics-container="true"> <br/> </div>"#);
        assert!(matches!(empty, Err(UtsushiError::Lyrics(_))));
    }

    #[test]
    fn test_unknown_entity_left_alone() {
        assert_eq!(decode_entity("#x41"), "A");
        assert_eq!(decode_entity("#65"), "A");
        assert_eq!(decode_entity("#xD800"), "&#xD800;");
    }
}
