use std::sync::Arc;

use tracing::debug;

use crate::{
    cache::{CacheStore, cache_key, read_cached, write_cached},
    elastic::SearchBackend,
    error::AppResult,
    models::{Film, FilmSummary},
    query::{self, Page, SortSpec},
};

pub const FILMS_INDEX: &str = "movies";

/// Read-only film lookups: cache-aside point reads, uncached search and
/// listings against the `movies` index.
#[derive(Clone)]
pub struct FilmRepository {
    cache: Arc<dyn CacheStore>,
    index: Arc<dyn SearchBackend>,
    ttl_seconds: u64,
}

impl FilmRepository {
    pub fn new(cache: Arc<dyn CacheStore>, index: Arc<dyn SearchBackend>, ttl_seconds: u64) -> Self {
        Self { cache, index, ttl_seconds }
    }

    /// Cache-aside lookup. Negative results are not cached; absence in both
    /// cache and index means the film does not exist.
    pub async fn get_by_id(&self, id: &str) -> AppResult<Option<Film>> {
        let key = cache_key(FILMS_INDEX, id);
        if let Some(film) = read_cached::<Film>(self.cache.as_ref(), &key).await? {
            debug!(film_id = %id, "film served from cache");
            return Ok(Some(film));
        }

        let Some(source) = self.index.get_source(FILMS_INDEX, id).await? else {
            return Ok(None);
        };
        let film: Film = serde_json::from_value(source)?;
        write_cached(self.cache.as_ref(), &key, &film, self.ttl_seconds).await?;
        Ok(Some(film))
    }

    /// Full-text title search. Never cached.
    pub async fn search(&self, text: &str, page: Page) -> AppResult<Vec<FilmSummary>> {
        let body = query::match_page("title", text, page);
        self.summaries(body).await
    }

    /// Sorted listing, optionally filtered by genre id. Never cached.
    pub async fn list(
        &self,
        genre: Option<&str>,
        sort: &str,
        page: Page,
    ) -> AppResult<Vec<FilmSummary>> {
        let sort = SortSpec::parse(sort);
        let body = query::film_listing(&sort, genre, page);
        self.summaries(body).await
    }

    async fn summaries(&self, body: serde_json::Value) -> AppResult<Vec<FilmSummary>> {
        let hits = self.index.search(FILMS_INDEX, body).await?;
        hits.into_iter()
            .map(|h| serde_json::from_value(h.source).map_err(Into::into))
            .collect()
    }
}
