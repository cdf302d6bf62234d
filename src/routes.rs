use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{Film, FilmSummary, Genre, PersonWithFilms},
    query::Page,
};

/// Deep-pagination cap shared with the index; requests that would page past
/// it are rejected before any query is issued.
const MAX_PAGE_WINDOW: u64 = 10_000;

fn default_page_size() -> u32 {
    50
}

fn default_page_number() -> u32 {
    1
}

fn default_sort() -> String {
    "-imdb_rating".to_string()
}

/// Validates the pagination bound and returns the page to query.
/// The product at exactly the cap is still allowed.
fn page(page_size: u32, page_number: u32) -> AppResult<Page> {
    if u64::from(page_size) * u64::from(page_number) > MAX_PAGE_WINDOW {
        return Err(AppError::InvalidRequest(
            "page_size * page_number give more than 10000".to_string(),
        ));
    }
    Ok(Page { size: page_size, number: page_number })
}

#[derive(Debug, Deserialize)]
pub struct ListFilmsParams {
    genre: Option<String>,
    #[serde(default = "default_sort")]
    sort: String,
    #[serde(default = "default_page_size")]
    page_size: u32,
    #[serde(default = "default_page_number")]
    page_number: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    query: String,
    #[serde(default = "default_page_size")]
    page_size: u32,
    #[serde(default = "default_page_number")]
    page_number: u32,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page_size")]
    page_size: u32,
    #[serde(default = "default_page_number")]
    page_number: u32,
}

pub async fn list_films(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListFilmsParams>,
) -> AppResult<Json<Vec<FilmSummary>>> {
    let page = page(params.page_size, params.page_number)?;
    let films = state.films.list(params.genre.as_deref(), &params.sort, page).await?;
    Ok(Json(films))
}

pub async fn search_films(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<FilmSummary>>> {
    let page = page(params.page_size, params.page_number)?;
    let films = state.films.search(&params.query, page).await?;
    Ok(Json(films))
}

pub async fn film_details(
    State(state): State<Arc<AppState>>,
    Path(film_id): Path<String>,
) -> AppResult<Json<Film>> {
    let film = state.films.get_by_id(&film_id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(film))
}

pub async fn list_genres(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Genre>>> {
    Ok(Json(state.genres.get_all().await?))
}

pub async fn genre_details(
    State(state): State<Arc<AppState>>,
    Path(genre_id): Path<String>,
) -> AppResult<Json<Genre>> {
    let genre = state.genres.get_by_id(&genre_id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(genre))
}

pub async fn search_persons(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<PersonWithFilms>>> {
    let page = page(params.page_size, params.page_number)?;
    let persons = state.persons.search(&params.query, page).await?;
    Ok(Json(persons))
}

pub async fn person_details(
    State(state): State<Arc<AppState>>,
    Path(person_id): Path<String>,
) -> AppResult<Json<PersonWithFilms>> {
    let person = state.persons.get_by_id(&person_id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(person))
}

/// An empty filmography and an unknown person id are indistinguishable
/// here: the films query alone answers both, and an empty page maps to
/// 404 either way. Kept for compatibility with the existing consumers.
pub async fn person_films(
    State(state): State<Arc<AppState>>,
    Path(person_id): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Vec<FilmSummary>>> {
    let page = page(params.page_size, params.page_number)?;
    let films = state.persons.films_by_person(&person_id, page).await?;
    if films.is_empty() {
        return Err(AppError::NotFound);
    }
    Ok(Json(films))
}
