use serde::{
    Deserialize,
    Serialize,
};

use super::scrape::LyricsScraper;
use crate::{
    core::{
        http::async_http_client,
        UtsushiError,
    },
    settings::Settings,
};

const SEARCH_URL: &str = "https://api.genius.com/search";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongHit {
    pub full_title: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchResponse,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    result: SongHit,
}

fn parse_search(body: &str) -> Result<Vec<SongHit>, UtsushiError> {
    let envelope: SearchEnvelope = serde_json::from_str(body)?;
    Ok(envelope.response.hits.into_iter().map(|hit| hit.result).collect())
}

/// Song search and lyric retrieval against Genius.
pub struct GeniusClient {
    http: reqwest::Client,
    token: String,
    scraper: LyricsScraper,
}

impl GeniusClient {
    pub fn new(token: &str) -> Result<Self, UtsushiError> {
        Ok(Self {
            http: async_http_client()?,
            token: token.trim().trim_start_matches("Bearer ").to_string(),
            scraper: LyricsScraper::new()?,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, UtsushiError> {
        match settings.genius_token.as_deref() {
            Some(token) if !token.trim().is_empty() => Self::new(token),
            _ => Err(UtsushiError::Lyrics(
                "no Genius API token configured (set GENIUS_TOKEN or genius_token in settings)"
                    .to_string(),
            )),
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SongHit>, UtsushiError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(UtsushiError::Lyrics("enter a song or artist to search for".to_string()));
        }

        let body = self
            .http
            .get(SEARCH_URL)
            .query(&[("q", query)])
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let hits = parse_search(&body)?;
        tracing::info!(query, hits = hits.len(), "Genius search finished");
        Ok(hits)
    }

    /// Downloads a song page and returns its lyric lines as practice sentences.
    pub async fn fetch_lyrics(&self, song: &SongHit) -> Result<Vec<String>, UtsushiError> {
        let html = self.http.get(&song.url).send().await?.error_for_status()?.text().await?;
        let lines = self.scraper.extract_lines(&html)?;
        tracing::info!(song = %song.full_title, lines = lines.len(), "Lyrics loaded");
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_hits() {
        let body = r#"{
            "meta": { "status": 200 },
            "response": {
                "hits": [
                    { "type": "song", "result": { "id": 1, "full_title": "夜に駆ける by YOASOBI", "url": "https://genius.com/Yoasobi-yoru-ni-kakeru-lyrics" } },
                    { "type": "song", "result": { "id": 2, "full_title": "群青 by YOASOBI", "url": "https://genius.com/Yoasobi-gunjou-lyrics" } }
                ]
            }
        }"#;

        let hits = parse_search(body).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].full_title, "夜に駆ける by YOASOBI");
        assert_eq!(hits[1].url, "https://genius.com/Yoasobi-gunjou-lyrics");
    }

    #[test]
    fn test_no_hits() {
        assert!(parse_search(r#"{ "response": { "hits": [] } }"#).unwrap().is_empty());
        assert!(parse_search(r#"{ "response": {} }"#).unwrap().is_empty());
        assert!(matches!(parse_search("<html>"), Err(UtsushiError::Json(_))));
    }

    #[test]
    fn test_missing_token_is_reported() {
        let settings = Settings { genius_token: Some("  ".to_string()), ..Settings::default() };
        assert!(matches!(GeniusClient::from_settings(&settings), Err(UtsushiError::Lyrics(_))));
    }

    #[tokio::test]
    async fn test_blank_query_rejected_before_request() {
        let client = GeniusClient::new("Bearer token").unwrap();
        assert_eq!(client.token, "token");
        assert!(matches!(client.search("   ").await, Err(UtsushiError::Lyrics(_))));
    }
}
