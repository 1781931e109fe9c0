pub mod client;
pub mod csrf;
pub mod error;
pub mod traits;
pub mod types;

pub use client::HttpBackend;
pub use csrf::CsrfSource;
pub use error::ApiError;
pub use traits::{FilmBackend, FilmRef};
