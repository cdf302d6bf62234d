use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub elastic_url: String,
    pub redis_url: String,
    pub cache_ttl_seconds: u64,
    pub projection_concurrency: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "8000".to_string()).parse().context("PORT")?;

        let elastic_url = std::env::var("ELASTIC_URL")
            .unwrap_or_else(|_| "http://localhost:9200".to_string());

        let redis_url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let cache_ttl_seconds: u64 =
            std::env::var("CACHE_TTL_SECONDS").ok().and_then(|s| s.parse().ok()).unwrap_or(300);

        let projection_concurrency: usize = std::env::var("PROJECTION_CONCURRENCY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            elastic_url,
            redis_url,
            cache_ttl_seconds,
            projection_concurrency,
        })
    }
}
