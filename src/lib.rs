//! Lectern Library Checkout Server
//!
//! A Rust REST API server for a small lending library: patrons browse the
//! catalog, librarians add books (by hand or scraped from a source page),
//! and users check out, return, and queue for books.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
