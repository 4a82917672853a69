//! REST implementation of [`TranscriptRecorder`] and [`ProfileSink`].
//!
//! `RestDeliveryClient` wraps a `reqwest::Client` and POSTs JSON to the
//! site backend. Any 2xx is success; everything else, including timeouts,
//! is an error. Requests are sent once and never retried.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;

use cw_domain::chat::{Profile, SessionId};
use cw_domain::config::DeliveryConfig;
use cw_domain::error::{Error, Result};

use crate::provider::{ProfileSink, TranscriptRecorder};
use crate::types::{ContactSubmission, TranscriptEntry};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// HTTP client for the site backend's transcript and contact endpoints.
///
/// Created once and shared by every session; the underlying
/// `reqwest::Client` maintains a connection pool.
#[derive(Debug, Clone)]
pub struct RestDeliveryClient {
    http: Client,
    base_url: String,
    transcript_path: String,
    contact_path: String,
    contact_marker: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl RestDeliveryClient {
    /// The configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build a new client from the shared `DeliveryConfig`.
    pub fn new(cfg: &DeliveryConfig) -> Result<Self> {
        let timeout = Duration::from_millis(cfg.timeout_ms);
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("building HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            transcript_path: cfg.transcript_path.clone(),
            contact_path: cfg.contact_path.clone(),
            contact_marker: cfg.contact_marker.clone(),
            api_key: cfg.api_key.clone(),
            timeout,
        })
    }

    // ── request helpers ──────────────────────────────────────────────

    /// Decorate a `RequestBuilder` with the standard widget headers.
    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        let trace_id = uuid::Uuid::new_v4().to_string();
        let mut rb = rb
            .header("X-Client-Type", "chat-widget")
            .header("X-Trace-Id", &trace_id);

        if let Some(ref key) = self.api_key {
            rb = rb.header("X-Api-Key", key);
        }
        rb
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST `body` as JSON once. Non-2xx statuses become [`Error::Delivery`].
    async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<()> {
        let endpoint = format!("POST {path}");
        let start = Instant::now();
        let result = self
            .decorate(self.http.post(self.url(path)).json(body))
            .send()
            .await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                tracing::debug!(endpoint = %endpoint, duration_ms, error = %e, "delivery request failed");
                return Err(from_reqwest(e));
            }
        };

        let status = resp.status();
        tracing::debug!(endpoint = %endpoint, status = status.as_u16(), duration_ms, "delivery response");

        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(Error::Delivery {
            endpoint,
            status: status.as_u16(),
            body,
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementations
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl TranscriptRecorder for RestDeliveryClient {
    async fn record(&self, entry: &TranscriptEntry) -> Result<()> {
        self.post_json(&self.transcript_path, entry).await
    }
}

#[async_trait]
impl ProfileSink for RestDeliveryClient {
    async fn submit(&self, _session_id: &SessionId, profile: &Profile) -> Result<()> {
        let body = ContactSubmission::from_profile(profile, &self.contact_marker);
        self.post_json(&self.contact_path, &body).await
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error conversion helper
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Convert a `reqwest::Error` into a domain `Error`.
///
/// Timeout errors become `Error::Timeout`; everything else becomes
/// `Error::Http`.
pub fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}
