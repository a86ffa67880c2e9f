// src/pipeline/archive.rs

//! Offline snapshot of one event.
//!
//! The archiver walks the API graph starting from the five top-level
//! resources, follows detail `self` links breadth-first, and finally
//! downloads every referenced media file. Every request is awaited in
//! sequence; a failing item is logged and skipped, never fatal.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;

use crate::error::Result;
use crate::models::{
    ArchiveReport, Config, FetchOutcome, MEDIA_DIR, QueueItem, TOP_LEVEL_RESOURCES,
};
use crate::pipeline::rewrite::{rewrite_files, rewrite_self_links};
use crate::storage::{LocalStorage, SnapshotStorage};
use crate::utils::http;
use crate::utils::url::event_base_url;

/// Stages of an archive run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveStage {
    Init,
    FetchTopLevel,
    DrainDetails,
    DownloadMedia,
    Done,
}

impl ArchiveStage {
    fn next(self) -> Self {
        match self {
            ArchiveStage::Init => ArchiveStage::FetchTopLevel,
            ArchiveStage::FetchTopLevel => ArchiveStage::DrainDetails,
            ArchiveStage::DrainDetails => ArchiveStage::DownloadMedia,
            ArchiveStage::DownloadMedia | ArchiveStage::Done => ArchiveStage::Done,
        }
    }
}

impl fmt::Display for ArchiveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArchiveStage::Init => "init",
            ArchiveStage::FetchTopLevel => "fetch top-level resources",
            ArchiveStage::DrainDetails => "fetch detail documents",
            ArchiveStage::DownloadMedia => "download media",
            ArchiveStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Crawl state for a single archive run.
pub struct Archiver<'a> {
    client: reqwest::Client,
    storage: &'a dyn SnapshotStorage,
    request_delay: Duration,
    visited: HashSet<String>,
    downloads: Vec<QueueItem>,
    details: Vec<QueueItem>,
    report: ArchiveReport,
}

impl<'a> Archiver<'a> {
    pub fn new(client: reqwest::Client, storage: &'a dyn SnapshotStorage) -> Self {
        Self {
            client,
            storage,
            request_delay: Duration::ZERO,
            visited: HashSet::new(),
            downloads: Vec::new(),
            details: Vec::new(),
            report: ArchiveReport::new(),
        }
    }

    /// Pause between consecutive requests.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Media files queued so far.
    pub fn downloads(&self) -> &[QueueItem] {
        &self.downloads
    }

    /// Detail documents queued so far, including ones already fetched.
    pub fn details(&self) -> &[QueueItem] {
        &self.details
    }

    pub fn report(&self) -> &ArchiveReport {
        &self.report
    }

    /// Fetch one JSON document, rewrite it and store it under `local_path`.
    ///
    /// A URL is fetched at most once per run. Failures are logged and
    /// reported as [`FetchOutcome::Failed`]; nothing is written for them.
    pub async fn fetch_and_save(&mut self, url: &str, local_path: &str) -> FetchOutcome {
        if !self.visited.insert(url.to_string()) {
            return FetchOutcome::Skipped;
        }

        log::info!("Fetching {}...", url);
        let outcome = match self.try_fetch_and_save(url, local_path).await {
            Ok(()) => {
                log::info!("Saved to {}", self.storage.location(local_path));
                FetchOutcome::Saved
            }
            Err(e) => {
                log::error!("Error processing {}: {}", url, e);
                FetchOutcome::Failed
            }
        };

        self.report.record(outcome);
        self.pause().await;
        outcome
    }

    async fn try_fetch_and_save(&mut self, url: &str, local_path: &str) -> Result<()> {
        let mut document = http::fetch_json(&self.client, url).await?;

        rewrite_files(&mut document, &mut self.downloads);
        let queued = self.details.len();
        rewrite_self_links(&mut document, &mut self.details);
        self.report.details_discovered += self.details.len() - queued;

        self.storage.write_json(local_path, &document).await
    }

    /// Fetch the fixed top-level resources of an event, in order.
    pub async fn fetch_top_level(&mut self, event_base: &str) {
        for resource in TOP_LEVEL_RESOURCES {
            let url = format!("{}{}", event_base, resource.endpoint);
            self.fetch_and_save(&url, resource.file).await;
        }
    }

    /// Work through the detail queue until no unvisited entries remain.
    pub async fn drain_details(&mut self) {
        // Fetching an item may append to `details`; the length is re-read every pass.
        let mut cursor = 0;
        while cursor < self.details.len() {
            let item = self.details[cursor].clone();
            cursor += 1;

            if self.is_visited(&item.url) {
                continue;
            }
            self.fetch_and_save(&item.url, &item.local_path).await;
        }
    }

    /// Download every queued media file that is not already on disk.
    pub async fn download_media(&mut self) -> Result<()> {
        log::info!("Downloading {} media files...", self.downloads.len());
        self.storage.ensure_dir(MEDIA_DIR).await?;

        let queue = self.downloads.clone();
        for item in &queue {
            if self.storage.exists(&item.local_path).await {
                log::debug!("Media already archived: {}", item.local_path);
                self.report.media_skipped += 1;
                continue;
            }

            log::info!("Downloading media {}...", item.url);
            match self.download_one(item).await {
                Ok(()) => self.report.media_downloaded += 1,
                Err(e) => {
                    log::error!("Failed to download {}: {}", item.url, e);
                    self.report.media_failed += 1;
                }
            }
            self.pause().await;
        }
        Ok(())
    }

    async fn download_one(&self, item: &QueueItem) -> Result<()> {
        let bytes = http::fetch_bytes(&self.client, &item.url).await?;
        self.storage.write_bytes(&item.local_path, &bytes).await
    }

    /// Run every stage against `event_base` and return the run summary.
    pub async fn run(mut self, event_base: &str) -> Result<ArchiveReport> {
        self.report.start_time = Utc::now();

        let mut stage = ArchiveStage::Init;
        while stage != ArchiveStage::Done {
            log::debug!("Stage: {}", stage);
            match stage {
                ArchiveStage::Init => self.storage.ensure_dir("").await?,
                ArchiveStage::FetchTopLevel => self.fetch_top_level(event_base).await,
                ArchiveStage::DrainDetails => self.drain_details().await,
                ArchiveStage::DownloadMedia => {
                    if !self.downloads.is_empty() {
                        self.download_media().await?;
                    }
                }
                ArchiveStage::Done => {}
            }
            stage = stage.next();
        }

        self.report.end_time = Utc::now();
        Ok(self.report)
    }

    async fn pause(&self) {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }
}

/// Archive one event from `api_endpoint` into `output_dir`.
pub async fn run_archive(
    config: &Config,
    api_endpoint: &str,
    event_code: &str,
    output_dir: &Path,
) -> Result<ArchiveReport> {
    let event_base = event_base_url(api_endpoint, event_code);
    log::info!("Archiving {} into {}", event_base, output_dir.display());

    let client = http::create_async_client(&config.crawler)?;
    let storage = LocalStorage::new(output_dir);
    let report = Archiver::new(client, &storage)
        .with_request_delay(Duration::from_millis(config.crawler.request_delay_ms))
        .run(&event_base)
        .await?;

    log::info!(
        "Saved {} documents ({} failed), downloaded {} media files \
         ({} already present, {} failed) in {}s",
        report.documents_saved,
        report.documents_failed,
        report.media_downloaded,
        report.media_skipped,
        report.media_failed,
        (report.end_time - report.start_time).num_seconds()
    );

    Ok(report)
}
