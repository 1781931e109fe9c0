pub mod calendar;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod reconcile;
