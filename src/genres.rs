use std::sync::Arc;

use tracing::debug;

use crate::{
    cache::{CacheStore, cache_key, read_cached, write_cached},
    elastic::SearchBackend,
    error::AppResult,
    models::Genre,
    query,
};

pub const GENRES_INDEX: &str = "genres";

/// Read-only genre lookups against the `genres` index.
#[derive(Clone)]
pub struct GenreRepository {
    cache: Arc<dyn CacheStore>,
    index: Arc<dyn SearchBackend>,
    ttl_seconds: u64,
}

impl GenreRepository {
    pub fn new(cache: Arc<dyn CacheStore>, index: Arc<dyn SearchBackend>, ttl_seconds: u64) -> Self {
        Self { cache, index, ttl_seconds }
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Option<Genre>> {
        let key = cache_key(GENRES_INDEX, id);
        if let Some(genre) = read_cached::<Genre>(self.cache.as_ref(), &key).await? {
            debug!(genre_id = %id, "genre served from cache");
            return Ok(Some(genre));
        }

        let Some(source) = self.index.get_source(GENRES_INDEX, id).await? else {
            return Ok(None);
        };
        let genre: Genre = serde_json::from_value(source)?;
        write_cached(self.cache.as_ref(), &key, &genre, self.ttl_seconds).await?;
        Ok(Some(genre))
    }

    /// Fetches every genre in one page: asks the index for its document
    /// count first, then requests exactly that many results. The catalog of
    /// genres is small and changes rarely, so this stays cheap regardless
    /// of the default page size. Never cached.
    pub async fn get_all(&self) -> AppResult<Vec<Genre>> {
        let count = self.index.count(GENRES_INDEX).await?;
        if count == 0 {
            return Ok(Vec::new());
        }
        let hits = self.index.search(GENRES_INDEX, query::match_all(count)).await?;
        hits.into_iter()
            .map(|h| serde_json::from_value(h.source).map_err(Into::into))
            .collect()
    }
}
