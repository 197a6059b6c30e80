use std::fmt;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::components::TemplateComponent;
use crate::config::Config;
use crate::errors::WikiError;
use crate::services::PageService;

pub mod form;

pub use form::SaveForm;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pages: PageService,
    pub templates: Arc<TemplateComponent>,
}

impl AppState {
    /// Prepare the data directory and load the templates. Either failing is
    /// fatal for the server.
    pub fn from_config(config: &Config) -> Result<Self, WikiError> {
        let pages = PageService::new(config.data_dir.clone());
        pages.ensure_data_dir()?;
        let templates = TemplateComponent::load(&config.template_dir)?;
        Ok(Self { pages, templates: Arc::new(templates) })
    }
}

/// A page title: one or more ASCII letters or digits
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageTitle(String);

impl PageTitle {
    pub fn new(raw: impl Into<String>) -> Result<Self, WikiError> {
        let raw = raw.into();
        if Self::is_valid(&raw) {
            Ok(Self(raw))
        } else {
            Err(WikiError::NotFound)
        }
    }

    pub fn is_valid(raw: &str) -> bool {
        !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_alphanumeric())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PageTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pulls the `:title` path segment and validates it. Anything that is not a
/// valid title is answered with 404, same as an unrouted path.
#[async_trait]
impl<S> FromRequestParts<S> for PageTitle
where
    S: Send + Sync,
{
    type Rejection = WikiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                log::debug!("Rejecting title segment: {}", e);
                WikiError::NotFound
            })?;
        PageTitle::new(raw)
    }
}

/// A wiki page as stored on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: PageTitle,
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(title: PageTitle, body: impl Into<Vec<u8>>) -> Self {
        Self { title, body: body.into() }
    }

    /// A page with no body, used when editing a page that does not exist yet
    pub fn blank(title: PageTitle) -> Self {
        Self { title, body: Vec::new() }
    }
}

/// Markup that is already escaped or built from trusted pieces and can be
/// written into a template verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SafeHtml(String);

impl SafeHtml {
    pub(crate) fn from_trusted(html: String) -> Self {
        Self(html)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// View model for the `view` template: the page body after link rewriting
#[derive(Debug, Clone)]
pub struct ViewPage {
    pub title: PageTitle,
    pub body: SafeHtml,
}
