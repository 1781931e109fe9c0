use reqwest::{Client, RequestBuilder, StatusCode};
use url::Url;

use filmoteka_core::models::{CalendarTab, FilmAction, NewPlannedEvent, PlannedEvent};

use crate::csrf::CsrfSource;
use crate::error::ApiError;
use crate::traits::{FilmBackend, FilmRef};
use crate::types::{
    error_body_message, first_validation_message, AddFilmResponse, AddStatus, Page,
    StatusKind, StatusResponse,
};

const ADD_FILM_PATH: &str = "/films/add/";
const UPDATE_STATUS_PATH: &str = "/films/update-status/";
const CALENDAR_EVENTS_PATH: &str = "/api/calendar_events/";

/// Marks requests as script-originated so the server answers with JSON.
const REQUESTED_WITH: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

/// Client for the film library's web endpoints.
pub struct HttpBackend {
    base: Url,
    http: Client,
    cookies: Option<String>,
    csrf: CsrfSource,
}

impl HttpBackend {
    pub fn new(base_url: &str, csrf: CsrfSource) -> Result<Self, ApiError> {
        Ok(Self {
            base: Url::parse(base_url)?,
            http: Client::new(),
            cookies: None,
            csrf,
        })
    }

    /// Session cookies (`sessionid=…; csrftoken=…`) sent with every request.
    pub fn with_cookies(mut self, header: impl Into<String>) -> Self {
        self.cookies = Some(header.into());
        self
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    fn get(&self, url: Url) -> RequestBuilder {
        self.with_session(self.http.get(url))
    }

    /// Build a mutating request. Fails before anything is sent when no
    /// anti-forgery token is available.
    fn mutating(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self
            .csrf
            .token(self.cookies.as_deref())
            .ok_or(ApiError::MissingCsrf)?;
        Ok(self.with_session(builder).header("X-CSRFToken", token))
    }

    fn with_session(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(REQUESTED_WITH.0, REQUESTED_WITH.1);
        match &self.cookies {
            Some(cookies) => builder.header("Cookie", cookies),
            None => builder,
        }
    }

    /// Check the HTTP response for errors and return the body text on failure.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(status = status.as_u16(), "Not authenticated");
            return Err(ApiError::Unauthorized {
                status: status.as_u16(),
            });
        }
        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "Backend error");
        Err(ApiError::Api {
            status: status.as_u16(),
            message: error_body_message(&body).unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
        })
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        let resp = builder.send().await?;
        Self::check_response(resp).await?;
        Ok(())
    }
}

impl FilmBackend for HttpBackend {
    async fn add_film(&self, tmdb_id: u64) -> Result<AddFilmResponse, ApiError> {
        let req = self.mutating(self.http.post(self.url(ADD_FILM_PATH)?))?;
        let resp = req
            .form(&[("tmdb_id", tmdb_id.to_string())])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let body: AddFilmResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        match body.status {
            AddStatus::Error => Err(ApiError::Rejected(
                body.message.unwrap_or_else(|| "Неизвестная ошибка".into()),
            )),
            AddStatus::Added | AddStatus::Exists => Ok(body),
        }
    }

    async fn update_status(
        &self,
        film: FilmRef,
        action: FilmAction,
    ) -> Result<StatusResponse, ApiError> {
        let (id_field, id_value) = film.form_field();
        tracing::debug!(%action, id_field, id_value = %id_value, "Updating film status");

        let req = self.mutating(self.http.post(self.url(UPDATE_STATUS_PATH)?))?;
        let resp = req
            .form(&[(id_field, id_value), ("action", action.as_wire_str().to_string())])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let body: StatusResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        if body.status == StatusKind::Error {
            return Err(ApiError::Rejected(
                body.message.unwrap_or_else(|| "Неизвестная ошибка".into()),
            ));
        }
        Ok(body)
    }

    async fn delete_film(&self, tmdb_id: u64) -> Result<(), ApiError> {
        let url = self.url(&format!("/films/delete/{tmdb_id}/"))?;
        self.send_empty(self.mutating(self.http.post(url))?).await
    }

    async fn delete_review(&self, review_id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/reviews/{review_id}/delete/"))?;
        self.send_empty(self.mutating(self.http.post(url))?).await
    }

    async fn list_events(&self, tab: CalendarTab, page: u32) -> Result<Page<PlannedEvent>, ApiError> {
        let mut url = self.url(CALENDAR_EVENTS_PATH)?;
        url.query_pairs_mut()
            .append_pair("view", tab.as_query_str())
            .append_pair("page", &page.to_string());

        let resp = self.get(url).send().await?;
        let resp = Self::check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn create_event(&self, event: &NewPlannedEvent) -> Result<PlannedEvent, ApiError> {
        let req = self.mutating(self.http.post(self.url(CALENDAR_EVENTS_PATH)?))?;
        let resp = req.json(event).send().await?;

        if resp.status() == StatusCode::BAD_REQUEST {
            let body: serde_json::Value = resp
                .json()
                .await
                .map_err(|e| ApiError::Parse(e.to_string()))?;
            let message = first_validation_message(&body)
                .unwrap_or_else(|| "Проверьте введённые данные".into());
            return Err(ApiError::Validation(message));
        }

        let resp = Self::check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn delete_event(&self, event_id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("{CALENDAR_EVENTS_PATH}{event_id}/"))?;
        self.send_empty(self.mutating(self.http.delete(url))?).await
    }

    async fn set_user_blocked(&self, user_id: i64, blocked: bool) -> Result<(), ApiError> {
        let verb = if blocked { "block" } else { "unblock" };
        let url = self.url(&format!("/users/panel/users/{user_id}/{verb}/"))?;
        self.send_empty(self.mutating(self.http.post(url))?).await
    }
}
