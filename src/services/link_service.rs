use std::sync::OnceLock;
use log::debug;
use regex::Regex;
use crate::types::SafeHtml;
use crate::utils::{escape_html, view_href};

/// Matches `[PageName]` cross-links
fn link_regex() -> &'static Regex {
    static LINK_REGEX: OnceLock<Regex> = OnceLock::new();
    LINK_REGEX.get_or_init(|| Regex::new(r"\[([a-zA-Z0-9]+)\]").expect("Invalid link regex"))
}

/// Service that turns bracketed page names into links to the view route
pub struct LinkService;

impl LinkService {
    pub fn new() -> Self {
        Self
    }

    /// Rewrite every `[Name]` into `<a href="/view/Name">Name</a>`.
    ///
    /// The text around the links is HTML-escaped, so the result is safe to
    /// write into a template verbatim. Invalid UTF-8 is replaced rather than
    /// rejected.
    pub fn rewrite(&self, body: &[u8]) -> SafeHtml {
        let text = String::from_utf8_lossy(body);
        let mut html = String::with_capacity(text.len());
        let mut last = 0;
        let mut count = 0usize;

        for caps in link_regex().captures_iter(&text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            html.push_str(&escape_html(&text[last..whole.start()]));
            html.push_str(&format!("<a href=\"{}\">{}</a>", view_href(name.as_str()), name.as_str()));
            last = whole.end();
            count += 1;
        }
        html.push_str(&escape_html(&text[last..]));

        debug!("Rewrote {} link(s) in {} bytes of page text", count, body.len());
        SafeHtml::from_trusted(html)
    }

    /// Page names referenced by `[Name]` links, in order of appearance
    pub fn links(&self, body: &[u8]) -> Vec<String> {
        let text = String::from_utf8_lossy(body);
        link_regex()
            .captures_iter(&text)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}

impl Default for LinkService {
    fn default() -> Self {
        Self::new()
    }
}
