use serde::Serialize;

/// Structured trace events emitted across all chatwidget crates.
///
/// Events never carry visitor-supplied values (names, emails, phone
/// numbers); only field kinds, lengths and identifiers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    SessionStarted {
        session_id: String,
    },
    StepAdvanced {
        session_id: String,
        from: String,
        to: String,
    },
    FieldRejected {
        session_id: String,
        field: String,
        candidate_chars: usize,
    },
    ProfileSubmitted {
        session_id: String,
    },
    TopicResolved {
        session_id: String,
        matched: bool,
    },
    TranscriptRecorded {
        session_id: String,
        message_id: String,
        origin_is_assistant: bool,
    },
    DeliveryFailed {
        session_id: String,
        operation: String,
        kind: String,
        error: String,
    },
    SessionExpired {
        session_id: String,
        idle_minutes: u64,
    },
    TopicTableLoaded {
        source: String,
        topics: usize,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "cw_event");
    }
}
