use std::borrow::Cow;
use std::fmt::Write;
use std::fs;
use std::path::Path;
use log::{debug, info};
use crate::errors::WikiError;
use crate::types::{Page, ViewPage};
use crate::utils::escape_html;

pub const VIEW_TEMPLATE: &str = "view";
pub const EDIT_TEMPLATE: &str = "edit";

/// A `{{NAME}}` placeholder a template may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Body,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "TITLE" => Some(Field::Title),
            "BODY" => Some(Field::Body),
            _ => None,
        }
    }
}

/// Values a template can be filled with. Implementations return HTML that is
/// ready to be written out: escaped text or trusted markup.
pub trait TemplateData {
    fn field(&self, field: Field) -> Cow<'_, str>;
}

impl TemplateData for ViewPage {
    fn field(&self, field: Field) -> Cow<'_, str> {
        match field {
            Field::Title => escape_html(self.title.as_str()),
            Field::Body => Cow::Borrowed(self.body.as_str()),
        }
    }
}

impl TemplateData for Page {
    fn field(&self, field: Field) -> Cow<'_, str> {
        match field {
            Field::Title => escape_html(self.title.as_str()),
            Field::Body => {
                let text = String::from_utf8_lossy(&self.body);
                Cow::Owned(escape_html(&text).into_owned())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(Field),
}

/// A template parsed into literal text and placeholders
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template source. Unterminated, empty, or unknown placeholders
    /// are errors.
    pub fn parse(name: &str, source: &str) -> Result<Self, WikiError> {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let after_open = &rest[start + 2..];
            let end = after_open.find("}}").ok_or_else(|| {
                WikiError::Template(format!("{}: unterminated placeholder", name))
            })?;
            let key = &after_open[..end];
            if key.trim().is_empty() {
                return Err(WikiError::Template(format!("{}: empty placeholder", name)));
            }
            let field = Field::parse(key).ok_or_else(|| {
                WikiError::Template(format!("{}: unknown placeholder {{{{{}}}}}", name, key.trim()))
            })?;
            segments.push(Segment::Placeholder(field));
            rest = &after_open[end + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        debug!("Parsed template '{}' into {} segments", name, segments.len());
        Ok(Self { name: name.to_string(), segments })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render(&self, data: &dyn TemplateData) -> Result<String, WikiError> {
        let mut html = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => html.push_str(text),
                Segment::Placeholder(field) => write!(html, "{}", data.field(*field))
                    .map_err(|e| WikiError::Render(format!("{}: {}", self.name, e)))?,
            }
        }
        Ok(html)
    }
}

/// The compiled `view` and `edit` templates, loaded once at startup
#[derive(Debug, Clone)]
pub struct TemplateComponent {
    view: Template,
    edit: Template,
}

impl TemplateComponent {
    /// Load `view.html` and `edit.html` from `dir`
    pub fn load(dir: &Path) -> Result<Self, WikiError> {
        info!("Loading templates from {:?}", dir);
        let view = Self::load_one(dir, VIEW_TEMPLATE)?;
        let edit = Self::load_one(dir, EDIT_TEMPLATE)?;
        Ok(Self { view, edit })
    }

    /// Build from in-memory sources
    pub fn from_sources(view: &str, edit: &str) -> Result<Self, WikiError> {
        Ok(Self {
            view: Template::parse(VIEW_TEMPLATE, view)?,
            edit: Template::parse(EDIT_TEMPLATE, edit)?,
        })
    }

    fn load_one(dir: &Path, name: &str) -> Result<Template, WikiError> {
        let path = dir.join(format!("{}.html", name));
        let source = fs::read_to_string(&path)
            .map_err(|e| WikiError::Template(format!("{}: {}", path.display(), e)))?;
        Template::parse(name, &source)
    }

    /// Render a page with its links already rewritten
    pub fn render_view(&self, page: &ViewPage) -> Result<String, WikiError> {
        self.view.render(page)
    }

    /// Render the edit form for a raw page
    pub fn render_edit(&self, page: &Page) -> Result<String, WikiError> {
        self.edit.render(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PageTitle, SafeHtml};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn title(raw: &str) -> PageTitle {
        PageTitle::new(raw).unwrap()
    }

    #[test]
    fn parses_placeholders_with_spaces() {
        let tpl = Template::parse("t", "<h1>{{ TITLE }}</h1>{{BODY}}").unwrap();
        let page = Page::new(title("Home"), "hi");
        assert_eq!(tpl.render(&page).unwrap(), "<h1>Home</h1>hi");
    }

    #[test]
    fn rejects_malformed_templates() {
        assert!(matches!(Template::parse("t", "<h1>{{TITLE</h1>"), Err(WikiError::Template(_))));
        assert!(matches!(Template::parse("t", "{{}}"), Err(WikiError::Template(_))));
        assert!(matches!(Template::parse("t", "{{AUTHOR}}"), Err(WikiError::Template(_))));
    }

    #[test]
    fn template_without_placeholders_renders_verbatim() {
        let tpl = Template::parse("t", "static } text {").unwrap();
        let page = Page::blank(title("X"));
        assert_eq!(tpl.render(&page).unwrap(), "static } text {");
    }

    #[test]
    fn view_body_is_not_escaped() {
        let templates = TemplateComponent::from_sources("{{TITLE}}|{{BODY}}", "").unwrap();
        let page = ViewPage {
            title: title("Test"),
            body: SafeHtml::from_trusted("<a href=\"/view/World\">World</a>".into()),
        };
        assert_eq!(
            templates.render_view(&page).unwrap(),
            "Test|<a href=\"/view/World\">World</a>"
        );
    }

    #[test]
    fn edit_body_is_escaped() {
        let templates = TemplateComponent::from_sources("", "<textarea>{{BODY}}</textarea>").unwrap();
        let page = Page::new(title("Test"), "</textarea><script>x</script>");
        assert_eq!(
            templates.render_edit(&page).unwrap(),
            "<textarea>&lt;/textarea&gt;&lt;script&gt;x&lt;/script&gt;</textarea>"
        );
    }

    #[test]
    fn load_requires_both_templates() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("view.html"), "{{BODY}}").unwrap();
        assert!(matches!(TemplateComponent::load(dir.path()), Err(WikiError::Template(_))));

        fs::write(dir.path().join("edit.html"), "{{BODY}}").unwrap();
        assert!(TemplateComponent::load(dir.path()).is_ok());
    }

    #[test]
    fn load_rejects_malformed_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("view.html"), "{{BODY}}").unwrap();
        fs::write(dir.path().join("edit.html"), "{{BODY").unwrap();
        let err = TemplateComponent::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("edit"));
    }
}
