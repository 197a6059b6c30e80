//! Flatwiki - a small wiki server over flat text files
//!
//! Pages live as `<title>.txt` in a data directory, are rendered through two
//! HTML templates, and link to each other with `[PageName]` syntax.

pub mod components;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logger;
pub mod services;
pub mod types;
pub mod utils;

use axum::{extract::DefaultBodyLimit, routing::{any, get, post}, Router};

// Re-export commonly used items
pub use config::Config;
pub use errors::WikiError;
pub use types::{AppState, Page, PageTitle, SafeHtml, SaveForm, ViewPage};
pub use services::{LinkService, PageService};
pub use components::TemplateComponent;

/// The route table: root redirect (any method), the three page routes, and a
/// 404 fallback
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(handlers::handle_root))
        .route("/view/:title", get(handlers::handle_view))
        .route("/edit/:title", get(handlers::handle_edit))
        .route(
            "/save/:title",
            post(handlers::handle_save).layer(DefaultBodyLimit::max(types::form::MAX_FORM_BYTES)),
        )
        .fallback(handlers::handle_not_found)
        .with_state(state)
}
