//! Session management for the chat widget host.
//!
//! Live sessions are held in memory, one [`cw_intake::WidgetController`]
//! each, and evicted after a configurable idle period.

pub mod lifecycle;
pub mod store;

pub use lifecycle::IdlePolicy;
pub use store::{SessionHandle, SessionStore};
