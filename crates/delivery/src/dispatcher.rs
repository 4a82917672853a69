//! Fire-and-forget execution of transcript and profile deliveries.
//!
//! Calls return immediately; the actual I/O runs on a spawned task bounded
//! by the delivery timeout. A timed-out call is treated exactly like a
//! failed one: reported through the [`FailureReporter`] and dropped.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::task::TaskTracker;

use cw_domain::chat::{Message, Profile, SessionId};
use cw_domain::error::{Error, Result};
use cw_domain::trace::TraceEvent;

use crate::provider::{ProfileSink, TranscriptRecorder};
use crate::report::{DeliveryFailure, FailureReporter, Operation};
use crate::types::TranscriptEntry;

/// Shared handle for issuing deliveries. Cheap to clone.
///
/// Must be used from within a tokio runtime.
#[derive(Clone)]
pub struct Dispatcher {
    recorder: Arc<dyn TranscriptRecorder>,
    sink: Arc<dyn ProfileSink>,
    reporter: Arc<dyn FailureReporter>,
    timeout: Duration,
    tracker: TaskTracker,
}

impl Dispatcher {
    pub fn new(
        recorder: Arc<dyn TranscriptRecorder>,
        sink: Arc<dyn ProfileSink>,
        reporter: Arc<dyn FailureReporter>,
        timeout: Duration,
    ) -> Self {
        Self {
            recorder,
            sink,
            reporter,
            timeout,
            tracker: TaskTracker::new(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Queue a transcript entry for `message` with the given profile snapshot.
    pub fn record(
        &self,
        session_id: &SessionId,
        message: &Message,
        snapshot: &Profile,
        user_agent: &str,
    ) {
        let entry = TranscriptEntry {
            session_id: session_id.clone(),
            message: message.clone(),
            user_details: snapshot.clone(),
            user_agent: user_agent.to_owned(),
        };
        let recorder = self.recorder.clone();

        self.spawn(session_id.clone(), Operation::RecordTranscript, async move {
            recorder.record(&entry).await?;
            TraceEvent::TranscriptRecorded {
                session_id: entry.session_id.to_string(),
                message_id: entry.message.id.clone(),
                origin_is_assistant: entry.message.origin_is_assistant,
            }
            .emit();
            Ok::<(), Error>(())
        });
    }

    /// Queue the one-time submission of a completed profile.
    pub fn submit_profile(&self, session_id: &SessionId, profile: &Profile) {
        let sink = self.sink.clone();
        let sid = session_id.clone();
        let profile = profile.clone();

        self.spawn(session_id.clone(), Operation::SubmitProfile, async move {
            sink.submit(&sid, &profile).await?;
            TraceEvent::ProfileSubmitted {
                session_id: sid.to_string(),
            }
            .emit();
            Ok::<(), Error>(())
        });
    }

    /// Number of deliveries still in flight.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait for every delivery issued so far to finish (or time out).
    pub async fn flush(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    fn spawn<F>(&self, session_id: SessionId, operation: Operation, fut: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let reporter = self.reporter.clone();
        let timeout = self.timeout;

        self.tracker.spawn(async move {
            let outcome = match tokio::time::timeout(timeout, fut).await {
                Ok(result) => result,
                Err(_) => Err(Error::Timeout(format!(
                    "no response within {}ms",
                    timeout.as_millis()
                ))),
            };
            if let Err(e) = outcome {
                reporter.report(&DeliveryFailure::from_error(session_id, operation, &e));
            }
        });
    }
}
