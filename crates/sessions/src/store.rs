//! In-memory registry of live widget sessions.
//!
//! Each session ID maps to a `SessionEntry` owning that session's
//! [`WidgetController`]. Nothing is persisted: the transcript lives with
//! the delivery backend, and a restarted server simply starts over.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};

use cw_delivery::Dispatcher;
use cw_domain::chat::SessionId;
use cw_domain::trace::TraceEvent;
use cw_intake::{TopicTable, WidgetController};

use crate::lifecycle::IdlePolicy;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session entry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Shared handle to one session's controller.
///
/// `WidgetController::submit` never awaits, so a blocking mutex is held
/// only for the duration of one turn.
pub type SessionHandle = Arc<Mutex<WidgetController>>;

struct SessionEntry {
    controller: SessionHandle,
    updated_at: DateTime<Utc>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct SessionStore {
    topics: Arc<TopicTable>,
    dispatcher: Dispatcher,
    sessions: RwLock<HashMap<SessionId, SessionEntry>>,
}

impl SessionStore {
    pub fn new(topics: Arc<TopicTable>, dispatcher: Dispatcher) -> Self {
        Self {
            topics,
            dispatcher,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a new session. The controller's greeting is already in its
    /// transcript when this returns.
    pub fn create(&self, user_agent: &str) -> (SessionId, SessionHandle) {
        let session_id = SessionId::new();
        let controller = WidgetController::new(
            session_id.clone(),
            user_agent,
            self.topics.clone(),
            self.dispatcher.clone(),
        );
        let handle = Arc::new(Mutex::new(controller));

        self.sessions.write().insert(
            session_id.clone(),
            SessionEntry {
                controller: handle.clone(),
                updated_at: Utc::now(),
            },
        );

        (session_id, handle)
    }

    /// Look up a session without marking it active.
    pub fn get(&self, session_id: &SessionId) -> Option<SessionHandle> {
        self.sessions
            .read()
            .get(session_id)
            .map(|e| e.controller.clone())
    }

    /// Look up a session and refresh its idle clock.
    pub fn touch(&self, session_id: &SessionId) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write();
        let entry = sessions.get_mut(session_id)?;
        entry.updated_at = Utc::now();
        Some(entry.controller.clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Drop every session idle past `policy` as of `now`. Returns the
    /// evicted IDs.
    pub fn sweep_idle(&self, policy: &IdlePolicy, now: DateTime<Utc>) -> Vec<SessionId> {
        let mut sessions = self.sessions.write();
        let expired: Vec<SessionId> = sessions
            .iter()
            .filter(|(_, e)| policy.is_expired(e.updated_at, now))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            sessions.remove(id);
            TraceEvent::SessionExpired {
                session_id: id.to_string(),
                idle_minutes: policy.idle_minutes(),
            }
            .emit();
        }

        if !expired.is_empty() {
            tracing::debug!(
                evicted = expired.len(),
                remaining = sessions.len(),
                "idle widget sessions evicted"
            );
        }
        expired
    }

    #[cfg(test)]
    fn backdate(&self, session_id: &SessionId, to: DateTime<Utc>) {
        if let Some(e) = self.sessions.write().get_mut(session_id) {
            e.updated_at = to;
        }
    }
}
