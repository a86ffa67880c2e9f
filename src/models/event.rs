// src/models/event.rs

//! Conference program resources as served by the Evan API.
//!
//! The API differs slightly between versions, so every model is lenient:
//! missing fields fall back to defaults and unknown fields are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An event (conference) with its tracks and venues.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    pub code: String,
    pub name: String,
    pub full_name: String,
    pub email: String,
    pub city: String,
    pub start_date: String,
    pub end_date: String,
    pub tracks: Vec<Track>,
    pub venues: Vec<Venue>,
    pub extra_data: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Track {
    pub id: u64,
    pub name: String,
    pub position: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Venue {
    pub id: u64,
    pub name: String,
    pub is_main: bool,
    pub rooms: Vec<Room>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Room {
    pub id: u64,
    pub name: String,
    pub capacity: Option<u64>,
}

/// A keyed block of editorial content (welcome text, venue info, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    pub key: String,
    pub content: String,
    pub content_type: String,
}

/// A scheduled session. `self_url` points at the detail document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub id: u64,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(rename = "self")]
    pub self_url: String,
    pub track: Option<Track>,
    pub room: Option<Room>,
    pub files: Vec<MediaFile>,
    pub extra_data: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paper {
    pub id: u64,
    #[serde(rename = "self")]
    pub self_url: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub files: Vec<MediaFile>,
    pub extra_data: PaperExtra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperExtra {
    pub authors: Vec<Author>,
    pub authors_str: Option<String>,
    pub internal_id: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keynote {
    pub id: u64,
    #[serde(rename = "self")]
    pub self_url: String,
    pub code: String,
    pub title: String,
    pub speaker: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub session: Option<u64>,
    pub subsession: Option<u64>,
    pub start_time: String,
    pub end_time: String,
    pub updated_at: String,
    pub files: Vec<MediaFile>,
    pub extra_data: Map<String, Value>,
}

/// A media attachment. `file` is either a remote URL or an archived
/// `/data/media/<name>` reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaFile {
    pub id: Option<u64>,
    pub name: String,
    pub file: String,
    pub size: Option<u64>,
}

impl Paper {
    /// Author names joined for display, preferring the API's own string.
    pub fn authors_display(&self) -> String {
        match &self.extra_data.authors_str {
            Some(s) if !s.trim().is_empty() => s.clone(),
            _ => self
                .extra_data
                .authors
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}
