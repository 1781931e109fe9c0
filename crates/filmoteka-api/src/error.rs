use thiserror::Error;

/// Errors from the film library backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("not authenticated (status {status})")]
    Unauthorized { status: u16 },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// A 200 response whose body says `status: "error"`.
    #[error("rejected: {0}")]
    Rejected(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("CSRF token not found")]
    MissingCsrf,

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// 401/403: the caller should send the user to the login page.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Text suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(_) => "Сервер недоступен".into(),
            Self::Unauthorized { .. } => "Требуется вход".into(),
            Self::Api { message, .. } | Self::Rejected(message) | Self::Validation(message) => {
                message.clone()
            }
            Self::Parse(_) => "Некорректный ответ сервера".into(),
            Self::MissingCsrf => "CSRF токен не найден!".into(),
            Self::Url(e) => e.to_string(),
        }
    }
}
