//! Local JSONL delivery for development and offline demos.
//!
//! Each session gets a `<sessionId>.jsonl` file under the output directory
//! with one [`TranscriptEntry`] per line. Completed profiles are appended
//! to `contacts.jsonl` in the same directory.
//!
//! File I/O runs on `spawn_blocking` so the tokio runtime is never blocked.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use cw_domain::chat::{Profile, SessionId};
use cw_domain::error::{Error, Result};

use crate::provider::{ProfileSink, TranscriptRecorder};
use crate::types::{ContactSubmission, TranscriptEntry};

const CONTACTS_FILE: &str = "contacts.jsonl";

pub struct JsonlDelivery {
    base_dir: PathBuf,
    contact_marker: String,
}

impl JsonlDelivery {
    /// Create the output directory if needed.
    pub fn new(base_dir: &Path, contact_marker: &str) -> Result<Self> {
        std::fs::create_dir_all(base_dir).map_err(Error::Io)?;
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            contact_marker: contact_marker.to_owned(),
        })
    }

    fn transcript_path(&self, session_id: &SessionId) -> PathBuf {
        self.base_dir.join(format!("{session_id}.jsonl"))
    }

    /// Read back a session's transcript, skipping malformed lines.
    pub fn read_transcript(&self, session_id: &SessionId) -> Result<Vec<TranscriptEntry>> {
        read_jsonl_file(&self.transcript_path(session_id))
    }

    /// Read back every recorded contact.
    pub fn read_contacts(&self) -> Result<Vec<ContactSubmission>> {
        read_jsonl_file(&self.base_dir.join(CONTACTS_FILE))
    }
}

#[async_trait]
impl TranscriptRecorder for JsonlDelivery {
    async fn record(&self, entry: &TranscriptEntry) -> Result<()> {
        append_line(self.transcript_path(&entry.session_id), entry).await
    }
}

#[async_trait]
impl ProfileSink for JsonlDelivery {
    async fn submit(&self, _session_id: &SessionId, profile: &Profile) -> Result<()> {
        let body = ContactSubmission::from_profile(profile, &self.contact_marker);
        append_line(self.base_dir.join(CONTACTS_FILE), &body).await
    }
}

// ── Private helpers ───────────────────────────────────────────────

async fn append_line<T: Serialize>(path: PathBuf, value: &T) -> Result<()> {
    let mut buf = serde_json::to_string(value)?;
    buf.push('\n');

    tokio::task::spawn_blocking(move || {
        use std::io::Write;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(Error::Io)?;
        file.write_all(buf.as_bytes()).map_err(Error::Io)?;
        Ok::<(), Error>(())
    })
    .await
    .map_err(|e| Error::Other(format!("spawn_blocking join: {e}")))?
}

fn read_jsonl_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let raw = std::fs::read_to_string(path).map_err(Error::Io)?;
    let mut items = Vec::new();
    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(line) {
            Ok(item) => items.push(item),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "skipping malformed JSONL line"
                );
            }
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_domain::chat::{FieldKind, Message};

    fn entry(session: &str, text: &str) -> TranscriptEntry {
        TranscriptEntry {
            session_id: SessionId::from(session),
            message: Message::user(text),
            user_details: Profile::default(),
            user_agent: "test".into(),
        }
    }

    #[tokio::test]
    async fn transcripts_are_split_per_session() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonlDelivery::new(dir.path(), "chat lead").unwrap();

        sink.record(&entry("a", "one")).await.unwrap();
        sink.record(&entry("b", "other")).await.unwrap();
        sink.record(&entry("a", "two")).await.unwrap();

        let a = sink.read_transcript(&SessionId::from("a")).unwrap();
        let texts: Vec<_> = a.iter().map(|e| e.message.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two"]);
        assert_eq!(sink.read_transcript(&SessionId::from("b")).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn contacts_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonlDelivery::new(dir.path(), "chat lead").unwrap();

        let mut profile = Profile::default();
        profile.accept(FieldKind::Name, "Ada");
        profile.accept(FieldKind::Email, "ada@example.com");
        profile.accept(FieldKind::Phone, "9876543210");
        sink.submit(&SessionId::from("a"), &profile).await.unwrap();

        let contacts = sink.read_contacts().unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].email, "ada@example.com");
        assert_eq!(contacts[0].message, "chat lead");
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonlDelivery::new(dir.path(), "chat lead").unwrap();
        let good = serde_json::to_string(&entry("s", "ok")).unwrap();
        std::fs::write(dir.path().join("s.jsonl"), format!("{good}\nnot json\n\n")).unwrap();

        let lines = sink.read_transcript(&SessionId::from("s")).unwrap();
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn missing_transcript_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonlDelivery::new(dir.path(), "chat lead").unwrap();
        assert!(sink.read_transcript(&SessionId::from("nope")).unwrap().is_empty());
    }
}
