//! `cw-delivery`: getting chat transcripts and completed profiles out of
//! the widget.
//!
//! Two sinks are modelled as traits: [`TranscriptRecorder`] (every message,
//! with the profile collected so far) and [`ProfileSink`] (the finished
//! contact record, once). [`Dispatcher`] runs both fire-and-forget: each
//! call is spawned, bounded by a timeout, and any failure goes to a
//! [`FailureReporter`] instead of back to the conversation.
//!
//! # Transport selection
//!
//! | `transport` | Implementation        | Best for                          |
//! |-------------|-----------------------|-----------------------------------|
//! | `rest`      | [`RestDeliveryClient`] | Production (site backend API)     |
//! | `jsonl`     | [`JsonlDelivery`]      | Local development, offline demos  |
//! | `disabled`  | [`NullDelivery`]       | Tests, previews                   |

pub mod dispatcher;
pub mod jsonl;
pub mod provider;
pub mod report;
pub mod rest;
pub mod types;

pub use dispatcher::Dispatcher;
pub use jsonl::JsonlDelivery;
pub use provider::{NullDelivery, ProfileSink, TranscriptRecorder};
pub use report::{DeliveryFailure, FailureKind, FailureReporter, Operation, TracingReporter};
pub use rest::{from_reqwest, RestDeliveryClient};
pub use types::{ContactSubmission, TranscriptEntry};

use std::sync::Arc;
use std::time::Duration;

use cw_domain::config::{DeliveryConfig, DeliveryTransport};
use cw_domain::error::Result;

/// Build a [`Dispatcher`] for the configured transport, reporting failures
/// through [`TracingReporter`].
pub fn create_dispatcher(cfg: &DeliveryConfig) -> Result<Dispatcher> {
    let timeout = Duration::from_millis(cfg.timeout_ms);
    let reporter: Arc<dyn FailureReporter> = Arc::new(TracingReporter);

    match cfg.transport {
        DeliveryTransport::Rest => {
            let client = Arc::new(RestDeliveryClient::new(cfg)?);
            tracing::info!(base_url = %cfg.base_url, "delivering to site backend over REST");
            Ok(Dispatcher::new(client.clone(), client, reporter, timeout))
        }
        DeliveryTransport::Jsonl => {
            let sink = Arc::new(JsonlDelivery::new(&cfg.jsonl_dir, &cfg.contact_marker)?);
            tracing::info!(dir = %cfg.jsonl_dir.display(), "delivering to local JSONL files");
            Ok(Dispatcher::new(sink.clone(), sink, reporter, timeout))
        }
        DeliveryTransport::Disabled => {
            tracing::warn!("delivery disabled: transcripts and profiles are dropped");
            let null = Arc::new(NullDelivery);
            Ok(Dispatcher::new(null.clone(), null, reporter, timeout))
        }
    }
}
