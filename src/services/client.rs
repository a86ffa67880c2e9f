// src/services/client.rs

//! Typed client for the Evan REST API.
//!
//! Requests are resolved through a [`FetchResolver`], so the same calls work
//! against the live API and against a snapshot written by the archiver.
//! Resolved `http(s)` locations are fetched over the network; anything else
//! is read from the local filesystem.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{Config, Content, Event, Keynote, Paper, Session};
use crate::services::resolver::{FetchMode, FetchResolver, resolver_for};
use crate::utils::http::create_async_client;
use crate::utils::url::{event_base_url, is_http_url, with_trailing_slash};

/// Listing endpoints answer with a bare array or a paginated object.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Items(Vec<T>),
    Page {
        #[serde(default = "Vec::new")]
        results: Vec<T>,
    },
}

impl<T> Listing<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            Listing::Items(items) | Listing::Page { results: items } => items,
        }
    }
}

/// Client for one event of the Evan API.
#[derive(Debug, Clone)]
pub struct EvanClient {
    http: reqwest::Client,
    api_base: String,
    archive_base: String,
    event_code: Option<String>,
    mode: FetchMode,
}

impl EvanClient {
    /// Create a client for the given API root with default settings.
    pub fn new(api_base: impl Into<String>) -> Result<Self> {
        let mut config = Config::default();
        config.client.api_base = api_base.into();
        Self::from_config(&config)
    }

    /// Create a client from application configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            http: create_async_client(&config.crawler)?,
            api_base: with_trailing_slash(config.client.api_base.trim()),
            archive_base: config.client.archive_base.clone(),
            event_code: None,
            mode: FetchMode::Live,
        })
    }

    pub fn set_event_code(&mut self, code: impl Into<String>) {
        self.event_code = Some(code.into());
    }

    pub fn event_code(&self) -> Option<&str> {
        self.event_code.as_deref()
    }

    /// Switch between the live API and an archived snapshot.
    ///
    /// `base` replaces the archive root; `None` keeps the configured one
    /// (`/data/` unless configured otherwise).
    pub fn set_archived(&mut self, enabled: bool, base: Option<&str>) {
        if let Some(base) = base {
            self.archive_base = base.to_string();
        }
        self.mode = if enabled {
            FetchMode::Archived {
                base: self.archive_base.clone(),
            }
        } else {
            FetchMode::Live
        };
    }

    pub fn is_archived(&self) -> bool {
        matches!(self.mode, FetchMode::Archived { .. })
    }

    pub fn mode(&self) -> &FetchMode {
        &self.mode
    }

    /// `<api_base>events/<code>/`
    pub fn event_base_url(&self) -> Result<String> {
        let code = self
            .event_code
            .as_deref()
            .ok_or_else(|| AppError::config("Event code not set. Call set_event_code() first."))?;
        Ok(event_base_url(&self.api_base, code))
    }

    /// Location a request for `url` is loaded from in the current mode.
    pub fn resolve(&self, url: &str) -> Result<String> {
        Ok(self.resolver()?.resolve(url))
    }

    fn resolver(&self) -> Result<Box<dyn FetchResolver>> {
        let event_base = match self.mode {
            FetchMode::Live => String::new(),
            FetchMode::Archived { .. } => self.event_base_url()?,
        };
        Ok(resolver_for(&self.mode, &event_base))
    }

    pub async fn fetch_event(&self) -> Result<Event> {
        let url = self.event_base_url()?;
        self.fetch_data(&url).await
    }

    pub async fn fetch_contents(&self) -> Result<Vec<Content>> {
        self.fetch_array("contents/").await
    }

    pub async fn fetch_sessions(&self) -> Result<Vec<Session>> {
        self.fetch_array("sessions/").await
    }

    pub async fn fetch_papers(&self) -> Result<Vec<Paper>> {
        self.fetch_array("papers/").await
    }

    pub async fn fetch_keynotes(&self) -> Result<Vec<Keynote>> {
        self.fetch_array("keynotes/").await
    }

    /// Fetch a session through its `self` link.
    pub async fn fetch_session_detail(&self, session_url: &str) -> Result<Session> {
        self.fetch_detail(session_url).await
    }

    /// Fetch any detail document through its `self` link, absolute or archived.
    pub async fn fetch_detail<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.fetch_data(url).await
    }

    async fn fetch_array<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>> {
        let url = format!("{}{}", self.event_base_url()?, endpoint);
        let listing: Listing<T> = self.fetch_data(&url).await?;
        Ok(listing.into_items())
    }

    async fn fetch_data<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let location = self.resolve(url)?;
        log::debug!("Loading {} from {}", url, location);
        let value = self.load(&location).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn load(&self, location: &str) -> Result<Value> {
        if is_http_url(location) {
            self.load_remote(location).await
        } else {
            Self::load_local(location).await
        }
    }

    async fn load_remote(&self, url: &str) -> Result<Value> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(AppError::Api {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
                data: serde_json::from_slice(&body).ok(),
            });
        }
        Ok(serde_json::from_slice(&body)?)
    }

    async fn load_local(path: &str) -> Result<Value> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::Api {
                status: 404,
                message: format!("Not Found: {path}"),
                data: None,
            }),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}
