pub mod health;
pub mod widget;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the full API router.
///
/// Every route is public: the widget runs in anonymous visitors'
/// browsers, so abuse protection is the rate limiter's job, not auth.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/health", get(health::health))
        .route("/v1/widget/sessions", post(widget::create_session))
        .route("/v1/widget/sessions/:id", get(widget::get_session))
        .route("/v1/widget/sessions/:id/messages", post(widget::post_message))
}
