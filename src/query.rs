use serde_json::{Value, json};

/// One-based page request, already validated by the facade.
#[derive(Clone, Copy, Debug)]
pub struct Page {
    pub size: u32,
    pub number: u32,
}

impl Page {
    pub fn offset(&self) -> u32 {
        self.number.saturating_sub(1) * self.size
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Sort field with its direction encoded as a sign prefix: `+field` is
/// ascending, `-field` descending, no sign defaults to descending.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn parse(raw: &str) -> Self {
        let (field, order) = match raw.strip_prefix('+') {
            Some(rest) => (rest, SortOrder::Asc),
            None => match raw.strip_prefix('-') {
                Some(rest) => (rest, SortOrder::Desc),
                None => (raw, SortOrder::Desc),
            },
        };
        Self { field: field.to_string(), order }
    }

    fn clause(&self) -> Value {
        json!([{ (self.field.as_str()): self.order.as_str() }])
    }
}

fn nested_match(path: &str, field: &str, value: &str) -> Value {
    json!({
        "nested": {
            "path": path,
            "query": { "match": { (field): value } }
        }
    })
}

/// Full-text match on a single field, paginated.
pub fn match_page(field: &str, text: &str, page: Page) -> Value {
    json!({
        "query": { "match": { (field): text } },
        "size": page.size,
        "from": page.offset(),
    })
}

/// Sorted film listing, optionally filtered by a nested match on
/// `genres.id`. The filter is a single-clause bool `should`, mirroring the
/// index's established query shape.
pub fn film_listing(sort: &SortSpec, genre: Option<&str>, page: Page) -> Value {
    let mut body = json!({
        "size": page.size,
        "from": page.offset(),
        "sort": sort.clause(),
    });
    if let Some(genre) = genre {
        body["query"] = json!({
            "bool": { "should": [nested_match("genres", "genres.id", genre)] }
        });
    }
    body
}

/// Films a person is involved in, in any role: bool `should` across the
/// three nested role paths, best-rated first.
pub fn films_by_person(person_id: &str, page: Page) -> Value {
    json!({
        "query": {
            "bool": {
                "should": [
                    nested_match("actors", "actors.id", person_id),
                    nested_match("writers", "writers.id", person_id),
                    nested_match("directors", "directors.id", person_id),
                ]
            }
        },
        "size": page.size,
        "from": page.offset(),
        "sort": [{ "imdb_rating": "desc" }],
    })
}

/// Fetch every document in an index in one page of `size`.
pub fn match_all(size: u64) -> Value {
    json!({
        "query": { "match_all": {} },
        "size": size,
    })
}
