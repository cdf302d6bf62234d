use serde::{Deserialize, Serialize};

/// Role a person holds on a film, in the order roles are discovered
/// when cross-referencing the film document.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Actor,
    Writer,
    Director,
}

/// Genre sub-document embedded in a film.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenreRef {
    #[serde(alias = "id")]
    pub uuid: String,
    pub name: String,
}

/// Person sub-document embedded in a film's role lists. The index stores
/// the display name under `name`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonRef {
    #[serde(alias = "id")]
    pub uuid: String,
    #[serde(alias = "name", default)]
    pub full_name: Option<String>,
}

/// Full film document as stored in the `movies` index. Index payloads spell
/// the identifier `id`; the API (and cache snapshots) spell it `uuid`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Film {
    #[serde(alias = "id")]
    pub uuid: String,
    pub title: String,
    #[serde(default)]
    pub imdb_rating: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<GenreRef>,
    #[serde(default)]
    pub actors: Vec<PersonRef>,
    #[serde(default)]
    pub writers: Vec<PersonRef>,
    #[serde(default)]
    pub directors: Vec<PersonRef>,
}

/// Title-and-rating projection used by film search, film listings and the
/// person filmography endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilmSummary {
    #[serde(alias = "id")]
    pub uuid: String,
    pub title: String,
    #[serde(default)]
    pub imdb_rating: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(alias = "id")]
    pub uuid: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(alias = "id")]
    pub uuid: String,
    pub full_name: String,
}

/// One film in a person's computed filmography: the film id plus every role
/// the person holds on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonFilm {
    pub uuid: String,
    pub roles: Vec<Role>,
}

/// Person view with the derived `films` projection attached. The projection
/// is recomputed on every read and never written to the cache.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonWithFilms {
    #[serde(flatten)]
    pub person: Person,
    pub films: Vec<PersonFilm>,
}
