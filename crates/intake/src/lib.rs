//! `cw-intake`: the chat widget's detail-collection pipeline.
//!
//! A visitor is walked through supplying name, email and phone number in
//! free text before any question answering happens:
//!
//! ```text
//! user text ─▶ extract ─▶ validate ─▶ IntakeMachine ─▶ next prompt
//!                                         │
//!                                         └─ Freeform ─▶ TopicTable::resolve
//! ```
//!
//! [`extract`], [`validate`] and [`TopicTable::resolve`] are pure.
//! [`WidgetController`] owns one session's state and hands every message
//! and the completed profile to a [`cw_delivery::Dispatcher`] without
//! waiting on it.

pub mod controller;
pub mod extract;
pub mod machine;
pub mod prompts;
pub mod topics;
pub mod validate;

pub use controller::{Turn, WidgetController};
pub use extract::extract;
pub use machine::{IntakeMachine, Outcome};
pub use topics::TopicTable;
pub use validate::is_valid;
