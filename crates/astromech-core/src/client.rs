//! Blocking HTTP client for the droid's hardware backend.
//!
//! Every call either completes with a 2xx response or fails with
//! `AstromechError::Transport`. Nothing is retried.

use crate::config::BackendConfig;
use crate::error::{AstromechError, Result};
use crate::script::Script;
use crate::types::{
    AudioFile, ControllerMap, MoveServoRequest, PlayAudioRequest, ServoMap,
};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: Client,
}

impl BackendClient {
    /// Client without a request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::build(base_url.into(), None)
    }

    pub fn from_config(cfg: &BackendConfig) -> Result<Self> {
        Self::build(cfg.base_url.clone(), cfg.timeout_secs.map(Duration::from_secs))
    }

    fn build(base_url: String, timeout: Option<Duration>) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AstromechError::transport("Failed to build HTTP client", e))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Endpoints
    // -----------------------------------------------------------------------

    /// `POST /routine` with the script document as the body.
    pub fn execute_routine(&self, script: &Script) -> Result<()> {
        self.post_json("routine", script, "Failed to execute routine")
    }

    pub fn servos(&self) -> Result<ServoMap> {
        self.get_json("servos", "Failed to fetch servos")
    }

    pub fn controllers(&self) -> Result<ControllerMap> {
        self.get_json("controllers", "Failed to fetch controllers")
    }

    pub fn audio_files(&self) -> Result<Vec<AudioFile>> {
        self.get_json("audio", "Failed to fetch audio files")
    }

    pub fn move_servo(&self, name: &str, angle: f64) -> Result<()> {
        let path = format!("servos/{}/move", urlencoding::encode(name));
        self.post_json(
            &path,
            &MoveServoRequest { angle },
            &format!("Failed to move servo {name}"),
        )
    }

    pub fn play_audio(&self, filename: &str) -> Result<()> {
        self.post_json(
            "audio/play",
            &PlayAudioRequest {
                filename: filename.to_string(),
            },
            &format!("Failed to play audio {filename}"),
        )
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, context: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        self.http
            .get(&url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<T>())
            .map_err(|e| {
                tracing::warn!(%url, error = %e, "backend request failed");
                AstromechError::transport(context, e)
            })
    }

    fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B, context: &str) -> Result<()> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        self.http
            .post(&url)
            .json(body)
            .send()
            .and_then(|resp| resp.error_for_status())
            .map(|_| ())
            .map_err(|e| {
                tracing::warn!(%url, error = %e, "backend request failed");
                AstromechError::transport(context, e)
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
