use async_trait::async_trait;
use redis::AsyncCommands;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::AppResult;

/// Key-value side-cache with per-entry TTL. Only point lookups by id are
/// ever cached; search and listing results always go to the index.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>>;
    async fn set(&self, key: &str, value: &[u8], ttl_seconds: u64) -> AppResult<()>;
    /// Ops/test utility, not part of the request path.
    async fn flush_all(&self) -> AppResult<()>;
}

/// Cache keys are namespaced by index so ids from different entity types
/// cannot collide: `movies:{id}`, `genres:{id}`, `persons:{id}`.
pub fn cache_key(index: &str, id: &str) -> String {
    format!("{index}:{id}")
}

/// Reads and deserializes a cached snapshot. A corrupt or incompatible
/// payload is treated as a miss so the caller falls through to the index.
pub async fn read_cached<T: DeserializeOwned>(
    cache: &dyn CacheStore,
    key: &str,
) -> AppResult<Option<T>> {
    let Some(bytes) = cache.get(key).await? else {
        return Ok(None);
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            debug!(key = %key, error = %err, "discarding undecodable cache entry");
            Ok(None)
        },
    }
}

pub async fn write_cached<T: Serialize>(
    cache: &dyn CacheStore,
    key: &str,
    value: &T,
    ttl_seconds: u64,
) -> AppResult<()> {
    let bytes = serde_json::to_vec(value)?;
    cache.set(key, &bytes, ttl_seconds).await
}

/// Redis-backed cache. Expiry is enforced server-side via `SETEX`, so a
/// read after the TTL elapses is simply a miss.
#[derive(Clone)]
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
}

impl RedisCache {
    pub async fn connect(url: &str) -> AppResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = redis::aio::ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &[u8], ttl_seconds: u64) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds).await?;
        Ok(())
    }

    async fn flush_all(&self) -> AppResult<()> {
        let mut conn = self.conn.clone();
        redis::cmd("FLUSHALL").query_async::<()>(&mut conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::test_support::MemoryCache;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Snapshot {
        uuid: String,
    }

    #[tokio::test]
    async fn corrupt_entry_reads_as_miss() {
        let cache = MemoryCache::new();
        cache.set("movies:f1", b"{not json", 300).await.unwrap();

        let got: Option<Snapshot> = read_cached(&cache, "movies:f1").await.unwrap();
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn round_trips_through_serialization() {
        let cache = MemoryCache::new();
        write_cached(&cache, "movies:f1", &serde_json::json!({ "uuid": "f1" }), 300)
            .await
            .unwrap();

        let got: Option<Snapshot> = read_cached(&cache, "movies:f1").await.unwrap();
        assert_eq!(got, Some(Snapshot { uuid: "f1".to_string() }));
    }

    #[test]
    fn keys_are_index_namespaced() {
        assert_eq!(cache_key("movies", "f1"), "movies:f1");
        assert_eq!(cache_key("persons", "p1"), "persons:p1");
    }

    #[tokio::test]
    async fn flush_all_empties_the_store() {
        let cache = MemoryCache::new();
        cache.set("genres:g1", b"{}", 300).await.unwrap();
        cache.flush_all().await.unwrap();
        assert_eq!(cache.get("genres:g1").await.unwrap(), None);
    }
}
