use serde::Deserialize;
use serde_json::Value;

use filmoteka_core::models::StatusFlags;

/// Outcome of adding a film to the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddStatus {
    Added,
    Exists,
    Error,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddFilmResponse {
    pub status: AddStatus,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Redirect,
    Error,
}

/// Response of the update-status endpoint.
///
/// Flags the server leaves out decode as `false`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: StatusKind,
    #[serde(default)]
    pub is_watched: bool,
    #[serde(default)]
    pub is_planned: bool,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub user_rating: Option<f32>,
    #[serde(default)]
    pub has_review: Option<bool>,
    /// Set when the film left the user's library.
    #[serde(default)]
    pub removed: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn flags(&self) -> StatusFlags {
        StatusFlags {
            // A review is what makes a film watched on the server side.
            watched: self.is_watched || self.has_review.unwrap_or(false),
            planned: self.is_planned,
            favorite: self.is_favorite,
            user_rating: self.user_rating,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Deserialize)]
struct PageBody<T> {
    count: u64,
    next: Option<String>,
    previous: Option<String>,
    results: Vec<T>,
}

/// Listing endpoints answer either with a paginated envelope or, with
/// pagination off, a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum PageOrList<T> {
    Page(PageBody<T>),
    List(Vec<T>),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match PageOrList::<T>::deserialize(deserializer)? {
            PageOrList::Page(body) => Page {
                count: body.count,
                next: body.next,
                previous: body.previous,
                results: body.results,
            },
            PageOrList::List(results) => Page {
                count: results.len() as u64,
                next: None,
                previous: None,
                results,
            },
        })
    }
}

/// First human-readable message in a validation error body.
///
/// Handles `{"field": ["msg", ...]}`, `{"detail": "msg"}` and bare strings;
/// `non_field_errors` wins when present.
pub fn first_validation_message(body: &Value) -> Option<String> {
    match body {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_validation_message),
        Value::Object(map) => map
            .get("non_field_errors")
            .and_then(first_validation_message)
            .or_else(|| map.values().find_map(first_validation_message)),
        _ => None,
    }
}

/// Pull `message` or `detail` out of an error body, if it is JSON.
pub(crate) fn error_body_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("detail"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
