//! End-to-end conversation tests for `WidgetController` with fake sinks.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use cw_delivery::{
    DeliveryFailure, Dispatcher, FailureReporter, ProfileSink, TranscriptEntry,
    TranscriptRecorder,
};
use cw_domain::chat::{Profile, SessionId, Step};
use cw_domain::error::{Error, Result};
use cw_intake::{TopicTable, WidgetController};

// ── fakes ────────────────────────────────────────────────────────────

#[derive(Default)]
struct Recording {
    entries: Mutex<Vec<TranscriptEntry>>,
    profiles: Mutex<Vec<Profile>>,
}

#[async_trait]
impl TranscriptRecorder for Recording {
    async fn record(&self, entry: &TranscriptEntry) -> Result<()> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }
}

#[async_trait]
impl ProfileSink for Recording {
    async fn submit(&self, _session_id: &SessionId, profile: &Profile) -> Result<()> {
        self.profiles.lock().push(profile.clone());
        Ok(())
    }
}

struct Failing;

#[async_trait]
impl TranscriptRecorder for Failing {
    async fn record(&self, _entry: &TranscriptEntry) -> Result<()> {
        Err(Error::Http("store unavailable".into()))
    }
}

#[async_trait]
impl ProfileSink for Failing {
    async fn submit(&self, _session_id: &SessionId, _profile: &Profile) -> Result<()> {
        Err(Error::Http("store unavailable".into()))
    }
}

struct Hanging;

#[async_trait]
impl TranscriptRecorder for Hanging {
    async fn record(&self, _entry: &TranscriptEntry) -> Result<()> {
        std::future::pending().await
    }
}

#[async_trait]
impl ProfileSink for Hanging {
    async fn submit(&self, _session_id: &SessionId, _profile: &Profile) -> Result<()> {
        std::future::pending().await
    }
}

#[derive(Default)]
struct Failures(Mutex<Vec<DeliveryFailure>>);

impl FailureReporter for Failures {
    fn report(&self, failure: &DeliveryFailure) {
        self.0.lock().push(failure.clone());
    }
}

// ── helpers ──────────────────────────────────────────────────────────

fn topics() -> Arc<TopicTable> {
    Arc::new(TopicTable::builtin().unwrap())
}

fn recording_session() -> (WidgetController, Arc<Recording>, Arc<Failures>) {
    let sink = Arc::new(Recording::default());
    let failures = Arc::new(Failures::default());
    let dispatcher = Dispatcher::new(
        sink.clone(),
        sink.clone(),
        failures.clone(),
        Duration::from_secs(1),
    );
    let ctl = WidgetController::new(SessionId::from("sess-1"), "test-agent", topics(), dispatcher);
    (ctl, sink, failures)
}

fn complete_intake(ctl: &mut WidgetController) {
    ctl.submit("Hi I am John Smith").unwrap();
    ctl.submit("reach me at john@example.com please").unwrap();
    ctl.submit("call 98 7654 3210").unwrap();
}

// ── scenarios ────────────────────────────────────────────────────────

#[tokio::test]
async fn name_is_extracted_from_greeting_phrase() {
    let (mut ctl, _, _) = recording_session();
    let turn = ctl.submit("Hi I am John Smith").unwrap();

    assert_eq!(turn.step, Step::CollectEmail);
    assert_eq!(ctl.profile().name(), "John Smith");
    assert!(turn.reply.origin_is_assistant);
    assert!(turn.reply.text.contains("John"));
}

#[tokio::test]
async fn invalid_email_reprompts_and_keeps_step() {
    let (mut ctl, _, _) = recording_session();
    ctl.submit("John Smith").unwrap();

    let turn = ctl.submit("not an email").unwrap();
    assert_eq!(turn.step, Step::CollectEmail);
    assert_eq!(ctl.profile().email(), "");
    assert!(turn.reply.text.contains("name@example.com"));
    assert!(!turn.completed_intake);
}

#[tokio::test]
async fn email_is_found_inside_a_sentence() {
    let (mut ctl, _, _) = recording_session();
    ctl.submit("John Smith").unwrap();

    let turn = ctl.submit("reach me at john@example.com please").unwrap();
    assert_eq!(turn.step, Step::CollectPhone);
    assert_eq!(ctl.profile().email(), "john@example.com");
}

#[tokio::test]
async fn spaced_phone_completes_intake_and_submits_once() {
    let (mut ctl, sink, _) = recording_session();
    ctl.submit("Hi I am John Smith").unwrap();
    ctl.submit("reach me at john@example.com please").unwrap();

    let turn = ctl.submit("call 98 7654 3210").unwrap();
    assert_eq!(turn.step, Step::Freeform);
    assert!(turn.completed_intake);
    assert_eq!(ctl.profile().phone(), "9876543210");

    // More traffic in FREEFORM must not submit again.
    ctl.submit("How much do courses cost?").unwrap();
    ctl.submit("asdkjh").unwrap();
    ctl.dispatcher().flush().await;

    let profiles = sink.profiles.lock();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].name(), "John Smith");
    assert_eq!(profiles[0].email(), "john@example.com");
    assert_eq!(profiles[0].phone(), "9876543210");
}

#[tokio::test]
async fn country_code_before_phone_does_not_block_intake() {
    let (mut ctl, _, _) = recording_session();
    ctl.submit("Hi I am John Smith").unwrap();
    ctl.submit("john@example.com").unwrap();

    let turn = ctl.submit("+91 9876543210").unwrap();
    assert_eq!(turn.step, Step::Freeform);
    assert!(turn.completed_intake);
    assert_eq!(ctl.profile().phone(), "9876543210");
}

#[tokio::test]
async fn freeform_questions_resolve_against_topic_table() {
    let (mut ctl, _, _) = recording_session();
    complete_intake(&mut ctl);
    let table = topics();

    let priced = ctl.submit("HOW MUCH do courses cost?  ").unwrap();
    assert_eq!(
        priced.reply.text,
        table.lookup("how much do courses cost?").unwrap()
    );

    let unknown = ctl.submit("asdkjh").unwrap();
    assert_eq!(unknown.reply.text, table.default_answer());
    assert_eq!(unknown.step, Step::Freeform);
}

// ── properties ───────────────────────────────────────────────────────

#[tokio::test]
async fn every_message_is_recorded_with_its_snapshot() {
    let (mut ctl, sink, _) = recording_session();
    ctl.submit("John Smith").unwrap();
    ctl.submit("john@example.com").unwrap();
    ctl.dispatcher().flush().await;

    let entries = sink.entries.lock();
    // greeting + 2 user messages + 2 replies
    assert_eq!(entries.len(), 5);
    assert_eq!(entries.len(), ctl.messages().len());

    let mut recorded: Vec<_> = entries.iter().map(|e| e.message.id.clone()).collect();
    let mut sent: Vec<_> = ctl.messages().iter().map(|m| m.id.clone()).collect();
    recorded.sort();
    sent.sort();
    assert_eq!(recorded, sent);

    let by_text = |text: &str| {
        entries
            .iter()
            .find(|e| e.message.text == text)
            .unwrap()
            .clone()
    };
    // The user message carries the profile as it was before processing.
    assert_eq!(by_text("John Smith").user_details.name(), "");
    assert_eq!(by_text("john@example.com").user_details.name(), "John Smith");
    assert_eq!(by_text("john@example.com").user_details.email(), "");
    assert!(entries.iter().all(|e| e.user_agent == "test-agent"));
    assert!(entries.iter().all(|e| e.session_id.as_str() == "sess-1"));
}

#[tokio::test]
async fn failing_sinks_never_reach_the_conversation() {
    let failures = Arc::new(Failures::default());
    let dispatcher = Dispatcher::new(
        Arc::new(Failing),
        Arc::new(Failing),
        failures.clone(),
        Duration::from_secs(1),
    );
    let mut ctl = WidgetController::new(SessionId::from("s"), "ua", topics(), dispatcher);

    complete_intake(&mut ctl);
    assert_eq!(ctl.step(), Step::Freeform);
    assert_eq!(ctl.messages().len(), 7);

    ctl.dispatcher().flush().await;
    // 7 transcript writes + 1 profile submission
    assert_eq!(failures.0.lock().len(), 8);
}

#[tokio::test(start_paused = true)]
async fn hanging_sinks_do_not_delay_replies() {
    let failures = Arc::new(Failures::default());
    let dispatcher = Dispatcher::new(
        Arc::new(Hanging),
        Arc::new(Hanging),
        failures.clone(),
        Duration::from_millis(500),
    );
    let mut ctl = WidgetController::new(SessionId::from("s"), "ua", topics(), dispatcher);

    let started = tokio::time::Instant::now();
    complete_intake(&mut ctl);
    let answer = ctl.submit("asdkjh").unwrap();
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert!(!answer.reply.text.is_empty());
    assert!(ctl.dispatcher().in_flight() > 0);

    ctl.dispatcher().flush().await;
    assert_eq!(ctl.dispatcher().in_flight(), 0);
    assert_eq!(failures.0.lock().len(), 10);
}

#[tokio::test]
async fn step_never_moves_backwards() {
    let (mut ctl, _, _) = recording_session();
    let inputs = [
        "", "x", "John Smith", "Grace Hopper", "bad", "a@b.co", "x@y.org", "123",
        "9876543210", "1234567890", "Jane Doe", "how much do courses cost?",
    ];

    let mut last = ctl.step();
    for input in inputs {
        ctl.submit(input);
        assert!(ctl.step() >= last, "step regressed on {input:?}");
        last = ctl.step();
    }
    assert_eq!(last, Step::Freeform);
    assert_eq!(ctl.profile().name(), "John Smith");
    assert_eq!(ctl.profile().email(), "a@b.co");
    assert_eq!(ctl.profile().phone(), "9876543210");
}

#[tokio::test]
async fn blank_submission_changes_nothing() {
    let (mut ctl, sink, _) = recording_session();
    assert!(ctl.submit("  \t ").is_none());
    assert_eq!(ctl.messages().len(), 1);
    assert_eq!(ctl.step(), Step::CollectName);

    ctl.dispatcher().flush().await;
    assert_eq!(sink.entries.lock().len(), 1);
}
