pub mod clean;
pub mod scrape;
