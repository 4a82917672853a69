//! Widget session endpoints.
//!
//! The browser widget opens a session, then posts one message per visitor
//! submission. Replies are computed synchronously; transcript and profile
//! delivery happen in the background and never affect the response.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use cw_domain::chat::{Message, SessionId, Step};

use crate::state::AppState;

// ── response bodies ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionOpened {
    pub session_id: SessionId,
    pub step: Step,
    pub messages: Vec<Message>,
    pub reply_delay_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct MessageReply {
    pub session_id: SessionId,
    pub step: Step,
    /// `None` when the submission was blank and ignored.
    pub reply: Option<Message>,
    pub profile_complete: bool,
    pub suggestions: Vec<String>,
    pub reply_delay_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub step: Step,
    pub messages: Vec<Message>,
    pub suggestions: Vec<String>,
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

fn session_not_found() -> Response {
    error(StatusCode::NOT_FOUND, "session not found")
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/widget/sessions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Open a new session. The visitor's `User-Agent` is captured here and
/// attached to every transcript entry of the session.
pub async fn create_session(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let (session_id, handle) = state.sessions.create(user_agent);
    let ctl = handle.lock();

    tracing::debug!(session_id = %session_id, "widget session opened");

    (
        StatusCode::CREATED,
        Json(SessionOpened {
            session_id,
            step: ctl.step(),
            messages: ctl.messages().to_vec(),
            reply_delay_ms: state.config.widget.reply_delay_ms,
        }),
    )
        .into_response()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/widget/sessions/:id/messages
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct PostMessageBody {
    pub text: String,
}

/// Submit one visitor message and return the assistant's reply.
pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<PostMessageBody>, JsonRejection>,
) -> Response {
    let session_id = SessionId::from(id);
    let Some(handle) = state.sessions.touch(&session_id) else {
        return session_not_found();
    };

    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return error(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    let mut ctl = handle.lock();
    let turn = ctl.submit(&body.text);

    Json(MessageReply {
        session_id,
        step: ctl.step(),
        reply: turn.map(|t| t.reply),
        profile_complete: ctl.profile().is_complete(),
        suggestions: ctl.suggestions(),
        reply_delay_ms: state.config.widget.reply_delay_ms,
    })
    .into_response()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/widget/sessions/:id
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Full transcript of a live session, e.g. to restore the widget after a
/// page navigation.
pub async fn get_session(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let session_id = SessionId::from(id);
    let Some(handle) = state.sessions.get(&session_id) else {
        return session_not_found();
    };

    let ctl = handle.lock();
    Json(SessionView {
        session_id,
        step: ctl.step(),
        messages: ctl.messages().to_vec(),
        suggestions: ctl.suggestions(),
    })
    .into_response()
}
