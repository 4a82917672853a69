use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Transcript + contact delivery
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where transcript entries and completed profiles are sent.
///
/// Delivery is best-effort: every call is bounded by `timeout_ms` and a
/// failed or timed-out call is logged, never retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default = "d_transport")]
    pub transport: DeliveryTransport,
    /// Base URL of the site backend (REST transport only).
    #[serde(default = "d_base_url")]
    pub base_url: String,
    #[serde(default = "d_transcript_path")]
    pub transcript_path: String,
    #[serde(default = "d_contact_path")]
    pub contact_path: String,
    /// Fixed `message` field sent with every contact registration so the
    /// backend can tell widget leads apart from form submissions.
    #[serde(default = "d_contact_marker")]
    pub contact_marker: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "d_5000")]
    pub timeout_ms: u64,
    /// Output directory for the JSONL transport.
    #[serde(default = "d_jsonl_dir")]
    pub jsonl_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryTransport {
    Rest,
    Jsonl,
    Disabled,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            transport: d_transport(),
            base_url: d_base_url(),
            transcript_path: d_transcript_path(),
            contact_path: d_contact_path(),
            contact_marker: d_contact_marker(),
            api_key: None,
            timeout_ms: 5000,
            jsonl_dir: d_jsonl_dir(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_transport() -> DeliveryTransport {
    DeliveryTransport::Rest
}
fn d_base_url() -> String {
    "http://localhost:3000".into()
}
fn d_transcript_path() -> String {
    "/api/chat-transcripts".into()
}
fn d_contact_path() -> String {
    "/api/contacts".into()
}
fn d_contact_marker() -> String {
    "Lead captured via chat widget".into()
}
fn d_5000() -> u64 {
    5000
}
fn d_jsonl_dir() -> PathBuf {
    PathBuf::from("./data/transcripts")
}
