// src/models/mod.rs

//! Domain models for the archiver and API client.

mod archive;
mod config;
mod event;

// Re-export all public types
pub use archive::{
    ArchiveReport, DetailKind, EVENT_FILE, FetchOutcome, LINK_ROOT, MEDIA_DIR, QueueItem,
    TOP_LEVEL_RESOURCES, TopLevelResource, local_link,
};
pub use config::{ClientConfig, Config, CrawlerConfig};
pub use event::{
    Author, Content, Event, Keynote, MediaFile, Paper, PaperExtra, Room, Session, Track, Venue,
};
