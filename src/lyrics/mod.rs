pub mod genius;
pub mod scrape;

pub use genius::{
    GeniusClient,
    SongHit,
};
pub use scrape::LyricsScraper;
