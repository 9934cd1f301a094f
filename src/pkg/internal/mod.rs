pub mod adaptors;
pub mod matching;
pub mod parser;
pub mod scraper;
pub mod uploader;
