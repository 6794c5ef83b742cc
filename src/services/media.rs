//! Image URL handling for gallery albums

use std::borrow::Cow;
use url::Url;

/// Inline grey tile shown in place of an image whose URL cannot be loaded
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml;utf8,%3Csvg xmlns='http://www.w3.org/2000/svg' width='400' height='300' viewBox='0 0 400 300'%3E%3Crect width='400' height='300' fill='%23e5e7eb'/%3E%3Ctext x='200' y='155' font-family='sans-serif' font-size='18' fill='%239ca3af' text-anchor='middle'%3EImage unavailable%3C/text%3E%3C/svg%3E";

/// Whether `url` is something a browser can fetch: an absolute http(s) URL
/// or a root-relative path on the site itself.
pub fn is_displayable(url: &str) -> bool {
    let url = url.trim();
    if url.starts_with('/') && !url.starts_with("//") {
        return !url.chars().any(char::is_whitespace);
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some(),
        Err(_) => false,
    }
}

/// The URL to render for an image, falling back to [`PLACEHOLDER_IMAGE`]
pub fn display_src(url: &str) -> Cow<'_, str> {
    if is_displayable(url) {
        Cow::Borrowed(url.trim())
    } else {
        Cow::Borrowed(PLACEHOLDER_IMAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_root_relative() {
        assert!(is_displayable("https://cdn.example.com/a.jpg"));
        assert!(is_displayable("http://example.com/b.png"));
        assert!(is_displayable("/uploads/c.jpg"));
    }

    #[test]
    fn rejects_everything_else() {
        assert!(!is_displayable("c.jpg"));
        assert!(!is_displayable("//cdn.example.com/a.jpg"));
        assert!(!is_displayable("ftp://example.com/a.jpg"));
        assert!(!is_displayable("javascript:alert(1)"));
        assert!(!is_displayable("/uploads/with space.jpg"));
        assert_eq!(display_src("nope"), PLACEHOLDER_IMAGE);
    }
}
