mod cache;
mod config;
mod elastic;
mod error;
mod films;
mod genres;
mod models;
mod persons;
mod query;
mod routes;
#[cfg(test)]
mod test_support;

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    cache::{CacheStore, RedisCache},
    config::Config,
    elastic::{ElasticClient, SearchBackend},
    films::FilmRepository,
    genres::GenreRepository,
    persons::PersonRepository,
};

pub struct AppState {
    pub films: FilmRepository,
    pub genres: GenreRepository,
    pub persons: PersonRepository,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/films", get(routes::list_films))
        .route("/api/v1/films/search", get(routes::search_films))
        .route("/api/v1/films/{film_id}", get(routes::film_details))
        .route("/api/v1/genres", get(routes::list_genres))
        .route("/api/v1/genres/{genre_id}", get(routes::genre_details))
        .route("/api/v1/persons/search", get(routes::search_persons))
        .route("/api/v1/persons/{person_id}", get(routes::person_details))
        .route("/api/v1/persons/{person_id}/film", get(routes::person_films))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,cinematek=debug".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let http = reqwest::Client::builder()
        .user_agent("cinematek/0.1")
        .timeout(Duration::from_secs(30))
        .build()?;

    let cache: Arc<dyn CacheStore> = Arc::new(RedisCache::connect(&config.redis_url).await?);
    let index: Arc<dyn SearchBackend> =
        Arc::new(ElasticClient::new(http, config.elastic_url.clone()));

    let state = Arc::new(AppState {
        films: FilmRepository::new(cache.clone(), index.clone(), config.cache_ttl_seconds),
        genres: GenreRepository::new(cache.clone(), index.clone(), config.cache_ttl_seconds),
        persons: PersonRepository::new(
            cache,
            index,
            config.cache_ttl_seconds,
            config.projection_concurrency,
        ),
    });

    let app = router(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
