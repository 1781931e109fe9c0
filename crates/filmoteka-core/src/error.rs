use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("config error: {0}")]
    Config(String),

    #[error("unknown film action: {0}")]
    UnknownAction(String),

    #[error("unknown calendar view: {0}")]
    UnknownView(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
