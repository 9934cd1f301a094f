use config::{Config, ConfigError, Environment};
use lazy_static::lazy_static;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub service_name: String,
    pub base_url: String,
    pub listen_port: String,
    pub database_url: String,
    pub database_pool_max_connections: u32,
    pub upload_dir: String,
    pub max_upload_size: u64,
    pub scrape_base_url: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let conf = Config::builder()
            .set_default("service_name", "resume-matcher")?
            .set_default("base_url", "http://localhost:8000")?
            .set_default("listen_port", "8000")?
            .set_default("database_url", "sqlite://resume_matcher.db?mode=rwc")?
            .set_default("database_pool_max_connections", 5i64)?
            .set_default("upload_dir", "uploads")?
            .set_default("max_upload_size", 16 * 1024 * 1024i64)?
            .set_default("scrape_base_url", "https://www.indeed.com/jobs")?
            .add_source(Environment::default())
            .build()?;
        conf.try_deserialize()
    }
}

lazy_static! {
    pub static ref settings: Settings = Settings::new().expect("improperly configured");
}
