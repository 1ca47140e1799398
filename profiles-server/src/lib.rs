//! Browser UI for managing profile records.

pub mod api;
pub mod config;
pub mod cookies;
pub mod csrf;
pub mod error;
pub mod flash;
pub mod views;
pub mod webserver;

pub use config::ServerConfig;
pub use error::AppError;
pub use webserver::{router, start_webserver, AppState};
