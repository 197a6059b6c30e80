use std::borrow::Cow;

/// Escape HTML special characters, including both quote styles so the
/// result is also safe inside attribute values
pub fn escape_html(text: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(text)
}

/// Location of the view page for a title
pub fn view_href(title: &str) -> String {
    format!("/view/{}", title)
}

/// Location of the edit form for a title
pub fn edit_href(title: &str) -> String {
    format!("/edit/{}", title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_and_quotes() {
        let escaped = escape_html(r#"<a href="x">'&'</a>"#);
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('"'));
        assert!(!escaped.contains('\''));
        assert!(escaped.starts_with("&lt;a href="));
    }

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(escape_html("FrontPage"), Cow::Borrowed("FrontPage")));
    }

    #[test]
    fn route_hrefs() {
        assert_eq!(view_href("Test"), "/view/Test");
        assert_eq!(edit_href("Test"), "/edit/Test");
    }
}
