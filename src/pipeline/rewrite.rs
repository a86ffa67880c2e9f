// src/pipeline/rewrite.rs

//! In-place rewriting of fetched documents.
//!
//! Two passes walk the parsed JSON tree:
//! - `rewrite_files`: `files[].file` URLs become `/data/media/<basename>`
//! - `rewrite_self_links`: detail `self` URLs become `/data/<kind>/<id>.json`
//!
//! Each pass appends what it rewrote to a work queue so the archiver can
//! fetch the originals later.

use serde_json::{Map, Value};
use url::Url;

use crate::models::{DetailKind, MEDIA_DIR, QueueItem, local_link};
use crate::utils::url::{last_segment, path_segments};

/// Rewrite every absolute `file` reference inside a `files` array.
///
/// Matches `files` at any depth. Entries of a `files` array are not
/// descended into further.
pub fn rewrite_files(value: &mut Value, downloads: &mut Vec<QueueItem>) {
    match value {
        Value::Array(items) => {
            for item in items {
                rewrite_files(item, downloads);
            }
        }
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                match child {
                    Value::Array(entries) if key == "files" => {
                        for entry in entries {
                            rewrite_file_entry(entry, downloads);
                        }
                    }
                    other => rewrite_files(other, downloads),
                }
            }
        }
        _ => {}
    }
}

fn rewrite_file_entry(entry: &mut Value, downloads: &mut Vec<QueueItem>) {
    let Some(Value::String(file)) = entry.get_mut("file") else {
        return;
    };
    if !file.starts_with("http") {
        return;
    }

    let Some(basename) = media_basename(file) else {
        return;
    };
    let local_path = format!("{MEDIA_DIR}/{basename}");
    let url = std::mem::replace(file, local_link(&local_path));
    downloads.push(QueueItem::new(url, local_path));
}

fn media_basename(file: &str) -> Option<String> {
    let url = match Url::parse(file) {
        Ok(url) => url,
        Err(e) => {
            log::warn!("Could not parse file URL: {file} ({e})");
            return None;
        }
    };
    let basename = last_segment(&url).map(str::to_string);
    if basename.is_none() {
        log::warn!("File URL has no file name: {file}");
    }
    basename
}

/// Rewrite every recognised `self` link and queue the detail document.
///
/// The `self` value itself is never descended into; sibling keys are.
pub fn rewrite_self_links(value: &mut Value, details: &mut Vec<QueueItem>) {
    match value {
        Value::Array(items) => {
            for item in items {
                rewrite_self_links(item, details);
            }
        }
        Value::Object(map) => {
            rewrite_self_field(map, details);
            for (key, child) in map.iter_mut() {
                if key != "self" {
                    rewrite_self_links(child, details);
                }
            }
        }
        _ => {}
    }
}

fn rewrite_self_field(map: &mut Map<String, Value>, details: &mut Vec<QueueItem>) {
    let Some(Value::String(link)) = map.get_mut("self") else {
        return;
    };
    if !link.starts_with("http") {
        return;
    }

    let url = match Url::parse(link) {
        Ok(url) => url,
        Err(_) => {
            log::warn!("Could not parse self URL: {link}");
            return;
        }
    };
    let Some(local_path) = detail_local_path(&url) else {
        return;
    };

    let original = std::mem::replace(link, local_link(&local_path));
    details.push(QueueItem::new(original, local_path));
}

/// Classify a detail URL and compute its snapshot path.
///
/// The kind's segment must be followed by at least one more segment, so a
/// listing URL such as `.../sessions/` is not mistaken for a detail.
pub fn detail_local_path(url: &Url) -> Option<String> {
    let segments = path_segments(url);
    let (last, parents) = segments.split_last()?;

    DetailKind::ALL
        .into_iter()
        .find(|kind| parents.contains(&kind.dir()))
        .map(|kind| kind.local_path(last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rewrite_files_top_level() {
        let mut doc = json!({"files": [{"file": "http://x/y/z.png"}]});
        let mut downloads = Vec::new();

        rewrite_files(&mut doc, &mut downloads);

        assert_eq!(doc, json!({"files": [{"file": "/data/media/z.png"}]}));
        assert_eq!(downloads, vec![QueueItem::new("http://x/y/z.png", "media/z.png")]);
    }

    #[test]
    fn test_rewrite_files_nested_in_arrays() {
        let mut doc = json!({
            "results": [
                {"id": 1, "files": [{"name": "a", "file": "https://h/m/a.pdf"}]},
                {"id": 2, "keynote": {"files": [{"file": "https://h/m/b.jpg", "size": 10}]}}
            ]
        });
        let mut downloads = Vec::new();

        rewrite_files(&mut doc, &mut downloads);

        assert_eq!(doc["results"][0]["files"][0]["file"], "/data/media/a.pdf");
        assert_eq!(doc["results"][1]["keynote"]["files"][0]["file"], "/data/media/b.jpg");
        assert_eq!(doc["results"][1]["keynote"]["files"][0]["size"], 10);
        assert_eq!(downloads.len(), 2);
        assert_eq!(downloads[1].local_path, "media/b.jpg");
    }

    #[test]
    fn test_rewrite_files_leaves_local_and_non_string() {
        let mut doc = json!({
            "files": [
                {"file": "/data/media/already.png"},
                {"file": 12},
                {"name": "no file key"},
                "not an object"
            ]
        });
        let before = doc.clone();
        let mut downloads = Vec::new();

        rewrite_files(&mut doc, &mut downloads);

        assert_eq!(doc, before);
        assert!(downloads.is_empty());
    }

    #[test]
    fn test_rewrite_files_non_array_files_is_descended() {
        let mut doc = json!({"files": {"inner": {"files": [{"file": "http://h/p/c.gif"}]}}});
        let mut downloads = Vec::new();

        rewrite_files(&mut doc, &mut downloads);

        assert_eq!(doc["files"]["inner"]["files"][0]["file"], "/data/media/c.gif");
        assert_eq!(downloads.len(), 1);
    }

    #[test]
    fn test_rewrite_files_keeps_duplicate_basenames() {
        let mut doc = json!({"files": [
            {"file": "http://a/one/pic.jpg"},
            {"file": "http://b/two/pic.jpg"}
        ]});
        let mut downloads = Vec::new();

        rewrite_files(&mut doc, &mut downloads);

        assert_eq!(doc["files"][0]["file"], "/data/media/pic.jpg");
        assert_eq!(doc["files"][1]["file"], "/data/media/pic.jpg");
        assert_eq!(downloads.len(), 2);
    }

    #[test]
    fn test_rewrite_files_unparseable_url_untouched() {
        let mut doc = json!({"files": [{"file": "http://"}]});
        let mut downloads = Vec::new();

        rewrite_files(&mut doc, &mut downloads);

        assert_eq!(doc["files"][0]["file"], "http://");
        assert!(downloads.is_empty());
    }

    #[test]
    fn test_rewrite_self_session() {
        let original = "https://host/api/v1/events/E/sessions/42/";
        let mut doc = json!({"self": original, "title": "S"});
        let mut details = Vec::new();

        rewrite_self_links(&mut doc, &mut details);

        assert_eq!(doc, json!({"self": "/data/sessions/42.json", "title": "S"}));
        assert_eq!(details, vec![QueueItem::new(original, "sessions/42.json")]);
    }

    #[test]
    fn test_rewrite_self_nested_papers_and_keynotes() {
        let mut doc = json!({
            "results": [
                {"self": "https://host/api/v1/events/E/papers/7/", "session": {
                    "self": "https://host/api/v1/events/E/sessions/3/"
                }},
                {"self": "https://host/api/v1/events/E/keynotes/k9/"}
            ]
        });
        let mut details = Vec::new();

        rewrite_self_links(&mut doc, &mut details);

        assert_eq!(doc["results"][0]["self"], "/data/papers/7.json");
        assert_eq!(doc["results"][0]["session"]["self"], "/data/sessions/3.json");
        assert_eq!(doc["results"][1]["self"], "/data/keynotes/k9.json");
        let paths: Vec<_> = details.iter().map(|d| d.local_path.as_str()).collect();
        assert_eq!(paths, ["papers/7.json", "sessions/3.json", "keynotes/k9.json"]);
    }

    #[test]
    fn test_rewrite_self_unknown_category_untouched() {
        let mut doc = json!({"self": "https://host/api/v1/events/E/", "tracks": [
            {"self": "https://host/api/v1/events/E/tracks/1/"}
        ]});
        let before = doc.clone();
        let mut details = Vec::new();

        rewrite_self_links(&mut doc, &mut details);

        assert_eq!(doc, before);
        assert!(details.is_empty());
    }

    #[test]
    fn test_rewrite_self_listing_url_untouched() {
        let mut doc = json!({"self": "https://host/api/v1/events/E/sessions/"});
        let mut details = Vec::new();

        rewrite_self_links(&mut doc, &mut details);

        assert_eq!(doc["self"], "https://host/api/v1/events/E/sessions/");
        assert!(details.is_empty());
    }

    #[test]
    fn test_rewrite_self_malformed_url_continues() {
        let mut doc = json!({
            "self": "http://[broken/sessions/1/",
            "child": {"self": "https://host/e/sessions/2/"}
        });
        let mut details = Vec::new();

        rewrite_self_links(&mut doc, &mut details);

        assert_eq!(doc["self"], "http://[broken/sessions/1/");
        assert_eq!(doc["child"]["self"], "/data/sessions/2.json");
        assert_eq!(details.len(), 1);
    }

    #[test]
    fn test_rewrite_self_value_not_descended() {
        let mut doc = json!({"self": {"self": "https://host/e/sessions/5/"}});
        let before = doc.clone();
        let mut details = Vec::new();

        rewrite_self_links(&mut doc, &mut details);

        assert_eq!(doc, before);
        assert!(details.is_empty());
    }

    #[test]
    fn test_detail_local_path_precedence() {
        let url = Url::parse("https://host/e/keynotes/sessions/4/").unwrap();
        assert_eq!(detail_local_path(&url), Some("sessions/4.json".to_string()));
    }
}
