// Environment-driven configuration, loaded once at startup. A local `.env`
// file is honored when present.

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub people_api_url: String,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let people_api_url =
            std::env::var("PEOPLE_API_URL").context("PEOPLE_API_URL must be set")?;
        let run_migrations = std::env::var("RUN_MIGRATION")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        Ok(Self {
            bind_addr,
            database_url,
            people_api_url,
            run_migrations,
        })
    }
}
