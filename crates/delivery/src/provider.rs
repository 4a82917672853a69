//! The delivery traits. Implementations may talk to the real site backend,
//! write local files, or be test doubles.

use async_trait::async_trait;
use cw_domain::chat::{Profile, SessionId};
use cw_domain::error::Result;

use crate::types::TranscriptEntry;

/// Audit log for every inbound and outbound chat message.
#[async_trait]
pub trait TranscriptRecorder: Send + Sync {
    async fn record(&self, entry: &TranscriptEntry) -> Result<()>;
}

/// Receiver of the completed contact profile.
#[async_trait]
pub trait ProfileSink: Send + Sync {
    async fn submit(&self, session_id: &SessionId, profile: &Profile) -> Result<()>;
}

/// Accepts everything and keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDelivery;

#[async_trait]
impl TranscriptRecorder for NullDelivery {
    async fn record(&self, entry: &TranscriptEntry) -> Result<()> {
        tracing::debug!(
            session_id = %entry.session_id,
            message_id = %entry.message.id,
            "transcript entry dropped (delivery disabled)"
        );
        Ok(())
    }
}

#[async_trait]
impl ProfileSink for NullDelivery {
    async fn submit(&self, session_id: &SessionId, _profile: &Profile) -> Result<()> {
        tracing::debug!(%session_id, "profile dropped (delivery disabled)");
        Ok(())
    }
}
