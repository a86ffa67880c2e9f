// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Ensure a base URL or path ends with a slash.
///
/// # Examples
/// ```
/// use evan_archive::utils::url::with_trailing_slash;
///
/// assert_eq!(with_trailing_slash("https://host/api/v1"), "https://host/api/v1/");
/// assert_eq!(with_trailing_slash("/data/"), "/data/");
/// ```
pub fn with_trailing_slash(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    }
}

/// Build the event-scoped base URL: `<api>/events/<code>/`.
pub fn event_base_url(api_base: &str, event_code: &str) -> String {
    format!("{}events/{}/", with_trailing_slash(api_base), event_code)
}

/// Whether a reference is an absolute HTTP(S) URL.
pub fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Non-empty segments of a URL path, still percent-encoded.
pub fn path_segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

/// Last non-empty path segment (`/img/pic.jpg` -> `pic.jpg`, `/sessions/42/` -> `42`).
pub fn last_segment(url: &Url) -> Option<&str> {
    path_segments(url).last().copied()
}

/// Join a relative path onto a base that is either a URL or a filesystem-style path.
pub fn join_location(base: &str, relative: &str) -> String {
    let base = with_trailing_slash(base);
    if is_http_url(&base) {
        if let Ok(joined) = Url::parse(&base).and_then(|u| u.join(relative)) {
            return joined.to_string();
        }
    }
    format!("{base}{relative}")
}
