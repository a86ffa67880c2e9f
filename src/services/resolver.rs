// src/services/resolver.rs

//! Live vs. archived resolution of API requests.
//!
//! Archived locations follow the archiver's snapshot layout: the event root
//! is `event.json`, a listing `sessions/` is `sessions.json`, a detail
//! `sessions/42/` is `sessions/42.json`.

use crate::models::{EVENT_FILE, LINK_ROOT};
use crate::utils::url::{is_http_url, join_location, with_trailing_slash};

/// Maps a logical API request onto the location it is loaded from.
pub trait FetchResolver: Send + Sync {
    fn resolve(&self, url: &str) -> String;
}

/// How the client loads documents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Every request goes to the live API
    #[default]
    Live,
    /// Requests are served from a snapshot rooted at `base`
    Archived { base: String },
}

/// Pick the resolver for a fetch mode.
pub fn resolver_for(mode: &FetchMode, event_base: &str) -> Box<dyn FetchResolver> {
    match mode {
        FetchMode::Live => Box::new(NetworkResolver),
        FetchMode::Archived { base } => Box::new(ArchiveResolver::new(event_base, base)),
    }
}

/// Resolves every request to itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkResolver;

impl FetchResolver for NetworkResolver {
    fn resolve(&self, url: &str) -> String {
        url.to_string()
    }
}

/// Resolves event requests into an archived snapshot.
#[derive(Debug, Clone)]
pub struct ArchiveResolver {
    event_base: String,
    archive_base: String,
}

impl ArchiveResolver {
    pub fn new(event_base: impl AsRef<str>, archive_base: impl AsRef<str>) -> Self {
        Self {
            event_base: with_trailing_slash(event_base.as_ref()),
            archive_base: with_trailing_slash(archive_base.as_ref()),
        }
    }

    /// Snapshot path for a URL relative to the event base.
    fn document_path(relative: &str) -> String {
        if relative.is_empty() {
            EVENT_FILE.to_string()
        } else if let Some(dir) = relative.strip_suffix('/') {
            format!("{dir}.json")
        } else {
            relative.to_string()
        }
    }
}

impl FetchResolver for ArchiveResolver {
    fn resolve(&self, url: &str) -> String {
        if !is_http_url(url) {
            // A reference written by the archiver, e.g. `/data/sessions/42.json`
            let relative = url
                .strip_prefix(LINK_ROOT)
                .unwrap_or_else(|| url.trim_start_matches('/'));
            return join_location(&self.archive_base, relative);
        }

        if url == self.event_base.trim_end_matches('/') {
            return join_location(&self.archive_base, EVENT_FILE);
        }
        match url.strip_prefix(&self.event_base) {
            Some(relative) => join_location(&self.archive_base, &Self::document_path(relative)),
            None => url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT_BASE: &str = "https://evan.ugent.be/api/v1/events/E/";

    fn archived() -> ArchiveResolver {
        ArchiveResolver::new(EVENT_BASE, "/data/")
    }

    #[test]
    fn test_network_resolver_is_identity() {
        let url = "https://evan.ugent.be/api/v1/events/E/sessions/";
        assert_eq!(NetworkResolver.resolve(url), url);
    }

    #[test]
    fn test_event_base_resolves_to_event_json() {
        assert_eq!(archived().resolve(EVENT_BASE), "/data/event.json");
        assert_eq!(
            archived().resolve("https://evan.ugent.be/api/v1/events/E"),
            "/data/event.json"
        );
    }

    #[test]
    fn test_listing_resolves_to_json_file() {
        let url = format!("{EVENT_BASE}sessions/");
        assert_eq!(archived().resolve(&url), "/data/sessions.json");
        let url = format!("{EVENT_BASE}contents/");
        assert_eq!(archived().resolve(&url), "/data/contents.json");
    }

    #[test]
    fn test_detail_matches_archiver_layout() {
        let url = format!("{EVENT_BASE}sessions/42/");
        assert_eq!(archived().resolve(&url), "/data/sessions/42.json");
    }

    #[test]
    fn test_rewritten_reference_resolves_under_base() {
        assert_eq!(archived().resolve("/data/sessions/42.json"), "/data/sessions/42.json");

        let custom = ArchiveResolver::new(EVENT_BASE, "/srv/snapshot");
        assert_eq!(
            custom.resolve("/data/sessions/42.json"),
            "/srv/snapshot/sessions/42.json"
        );
        assert_eq!(custom.resolve("/papers/1.json"), "/srv/snapshot/papers/1.json");
    }

    #[test]
    fn test_http_archive_base() {
        let resolver = ArchiveResolver::new(EVENT_BASE, "https://mirror.example.com/data/");
        assert_eq!(
            resolver.resolve(&format!("{EVENT_BASE}keynotes/")),
            "https://mirror.example.com/data/keynotes.json"
        );
    }

    #[test]
    fn test_foreign_url_passes_through() {
        let url = "https://evan.ugent.be/api/v1/events/OTHER/sessions/";
        assert_eq!(archived().resolve(url), url);
    }

    #[test]
    fn test_resolver_for_mode() {
        let live = resolver_for(&FetchMode::Live, EVENT_BASE);
        assert_eq!(live.resolve(EVENT_BASE), EVENT_BASE);

        let mode = FetchMode::Archived {
            base: "/data/".to_string(),
        };
        let archive = resolver_for(&mode, EVENT_BASE);
        assert_eq!(archive.resolve(EVENT_BASE), "/data/event.json");
    }
}
