use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use log::{debug, info, log_enabled, warn, Level};

use crate::errors::WikiError;
use crate::services::LinkService;
use crate::types::{AppState, Page, PageTitle, SaveForm, ViewPage};
use crate::utils::{edit_href, view_href};

/// Page the root path redirects to
pub const FRONT_PAGE: &str = "FrontPage";

/// 302 redirect
fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Handle root path requests
pub async fn handle_root() -> Response {
    debug!("Root request, redirecting to {}", FRONT_PAGE);
    found(view_href(FRONT_PAGE))
}

/// Render a page, or send the client to the edit form if it does not exist
pub async fn handle_view(
    State(state): State<AppState>,
    title: PageTitle,
) -> Result<Response, WikiError> {
    info!("View request received: '{}'", title);

    let page = match state.pages.load(&title) {
        Ok(page) => page,
        Err(WikiError::NotFound) => {
            debug!("Page '{}' missing, redirecting to edit", title);
            return Ok(found(edit_href(title.as_str())));
        }
        Err(e) => return Err(e),
    };

    let links = LinkService::new();
    if log_enabled!(Level::Debug) {
        debug!("Page '{}' links to {:?}", title, links.links(&page.body));
    }
    let view = ViewPage { body: links.rewrite(&page.body), title: page.title };
    let html = state.templates.render_view(&view)?;
    Ok(Html(html).into_response())
}

/// Render the edit form; a missing page edits as blank
pub async fn handle_edit(
    State(state): State<AppState>,
    title: PageTitle,
) -> Result<Response, WikiError> {
    info!("Edit request received: '{}'", title);

    let page = match state.pages.load(&title) {
        Ok(page) => page,
        Err(WikiError::NotFound) => {
            debug!("Page '{}' missing, editing blank page", title);
            Page::blank(title)
        }
        Err(e) => return Err(e),
    };

    let html = state.templates.render_edit(&page)?;
    Ok(Html(html).into_response())
}

/// Persist the submitted body and redirect to the page
pub async fn handle_save(
    State(state): State<AppState>,
    title: PageTitle,
    form: SaveForm,
) -> Result<Response, WikiError> {
    info!("Save request received: '{}', {} bytes", title, form.body.len());

    let location = view_href(title.as_str());
    let page = Page::new(title, form.body);
    state.pages.save(&page)?;
    Ok(found(location))
}

/// Anything the route table does not match
pub async fn handle_not_found(uri: Uri) -> WikiError {
    warn!("Path not found: '{}'", uri.path());
    WikiError::NotFound
}
