use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};
use tracing::debug;

use crate::{
    cache::{CacheStore, cache_key, read_cached, write_cached},
    elastic::SearchBackend,
    error::AppResult,
    films::FILMS_INDEX,
    models::{Film, FilmSummary, Person, PersonFilm, PersonWithFilms, Role},
    query::{self, Page},
};

pub const PERSONS_INDEX: &str = "persons";

/// One page is enough for any realistic filmography; the role scan is a
/// single query instead of a paginated walk.
const ROLE_SCAN_SIZE: u32 = 1000;

/// Read-only person lookups plus the composite assembly of the derived
/// `films` projection, which cross-references the `movies` index.
#[derive(Clone)]
pub struct PersonRepository {
    cache: Arc<dyn CacheStore>,
    index: Arc<dyn SearchBackend>,
    ttl_seconds: u64,
    projection_concurrency: usize,
}

impl PersonRepository {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        index: Arc<dyn SearchBackend>,
        ttl_seconds: u64,
        projection_concurrency: usize,
    ) -> Self {
        Self { cache, index, ttl_seconds, projection_concurrency }
    }

    /// Cache-aside on the base person fields only. The `films` projection
    /// is derived data and is recomputed fresh on every read, cache hit or
    /// not, so the cache never goes stale on filmography changes.
    pub async fn get_by_id(&self, id: &str) -> AppResult<Option<PersonWithFilms>> {
        let Some(person) = self.base_person(id).await? else {
            return Ok(None);
        };
        let films = self.films_with_roles(&person.uuid).await?;
        Ok(Some(PersonWithFilms { person, films }))
    }

    async fn base_person(&self, id: &str) -> AppResult<Option<Person>> {
        let key = cache_key(PERSONS_INDEX, id);
        if let Some(person) = read_cached::<Person>(self.cache.as_ref(), &key).await? {
            debug!(person_id = %id, "person served from cache");
            return Ok(Some(person));
        }

        let Some(source) = self.index.get_source(PERSONS_INDEX, id).await? else {
            return Ok(None);
        };
        let person: Person = serde_json::from_value(source)?;
        write_cached(self.cache.as_ref(), &key, &person, self.ttl_seconds).await?;
        Ok(Some(person))
    }

    /// Full-text search on `full_name`. Base fields come straight from the
    /// search hits; only the per-hit films projections still need the
    /// index, and those are independent of each other, so they run
    /// concurrently with a bounded fan-out. Hit order is preserved.
    pub async fn search(&self, text: &str, page: Page) -> AppResult<Vec<PersonWithFilms>> {
        let body = query::match_page("full_name", text, page);
        let hits = self.index.search(PERSONS_INDEX, body).await?;
        let persons: Vec<Person> = hits
            .into_iter()
            .map(|h| serde_json::from_value(h.source))
            .collect::<Result<_, _>>()?;

        stream::iter(persons)
            .map(|person| async move {
                let films = self.films_with_roles(&person.uuid).await?;
                Ok::<_, crate::error::AppError>(PersonWithFilms { person, films })
            })
            .buffered(self.projection_concurrency.max(1))
            .try_collect()
            .await
    }

    /// Films the person is involved in, best-rated first. Rows come from
    /// the `movies` index; an unknown person id and a person with no films
    /// both yield an empty page.
    pub async fn films_by_person(&self, id: &str, page: Page) -> AppResult<Vec<FilmSummary>> {
        let hits = self.index.search(FILMS_INDEX, query::films_by_person(id, page)).await?;
        hits.into_iter()
            .map(|h| serde_json::from_value(h.source).map_err(Into::into))
            .collect()
    }

    /// Composite assembler: fetches every film the person appears in, then
    /// derives the role list per film by membership in the three nested
    /// role lists. Roles keep the fixed order actor, writer, director; film
    /// order follows the index result order.
    pub async fn films_with_roles(&self, id: &str) -> AppResult<Vec<PersonFilm>> {
        let body = query::films_by_person(id, Page { size: ROLE_SCAN_SIZE, number: 1 });
        let hits = self.index.search(FILMS_INDEX, body).await?;

        let mut result = Vec::with_capacity(hits.len());
        for h in hits {
            let film: Film = serde_json::from_value(h.source)?;
            let mut roles = Vec::new();
            if film.actors.iter().any(|p| p.uuid == id) {
                roles.push(Role::Actor);
            }
            if film.writers.iter().any(|p| p.uuid == id) {
                roles.push(Role::Writer);
            }
            if film.directors.iter().any(|p| p.uuid == id) {
                roles.push(Role::Director);
            }
            result.push(PersonFilm { uuid: film.uuid, roles });
        }
        Ok(result)
    }
}
