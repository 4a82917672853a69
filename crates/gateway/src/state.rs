use std::sync::Arc;

use cw_delivery::Dispatcher;
use cw_domain::config::Config;
use cw_intake::TopicTable;
use cw_sessions::SessionStore;

/// Shared application state passed to all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Loaded and validated once at startup.
    pub topics: Arc<TopicTable>,
    /// Fire-and-forget transcript and profile delivery.
    pub dispatcher: Dispatcher,
    pub sessions: Arc<SessionStore>,
}
