//! Per-session conversation controller.
//!
//! `WidgetController` ties the [`IntakeMachine`] and the [`TopicTable`]
//! to a transcript. Every message it appends is handed to the
//! [`Dispatcher`] immediately and never awaited, so a slow or broken
//! backend cannot delay a reply.

use std::sync::Arc;

use cw_delivery::Dispatcher;
use cw_domain::chat::{Message, Profile, SessionId, Step};
use cw_domain::trace::TraceEvent;

use crate::machine::{IntakeMachine, Outcome};
use crate::prompts;
use crate::topics::TopicTable;

/// Result of one accepted visitor message.
#[derive(Debug, Clone)]
pub struct Turn {
    pub user: Message,
    pub reply: Message,
    /// Step after the message was processed.
    pub step: Step,
    /// True only on the turn that completed the profile.
    pub completed_intake: bool,
}

pub struct WidgetController {
    session_id: SessionId,
    user_agent: String,
    machine: IntakeMachine,
    messages: Vec<Message>,
    topics: Arc<TopicTable>,
    dispatcher: Dispatcher,
}

impl WidgetController {
    /// Open a session. The greeting is appended and recorded right away.
    pub fn new(
        session_id: SessionId,
        user_agent: impl Into<String>,
        topics: Arc<TopicTable>,
        dispatcher: Dispatcher,
    ) -> Self {
        let mut ctl = Self {
            session_id,
            user_agent: user_agent.into(),
            machine: IntakeMachine::new(),
            messages: Vec::new(),
            topics,
            dispatcher,
        };

        TraceEvent::SessionStarted {
            session_id: ctl.session_id.to_string(),
        }
        .emit();

        let greeting = Message::assistant(prompts::greeting());
        ctl.push(greeting);
        ctl
    }

    /// Process one visitor message and produce the assistant's reply.
    ///
    /// Input that is empty after trimming is ignored: nothing is appended
    /// or recorded and `None` is returned.
    pub fn submit(&mut self, text: &str) -> Option<Turn> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let user = Message::user(text);
        self.push(user.clone());

        let from = self.machine.step();
        let mut completed_intake = false;
        let reply_text = match self.machine.advance(text) {
            Outcome::Advanced { to, .. } => {
                self.step_event(from, to);
                prompts::advance(to, self.machine.profile())
            }
            Outcome::Completed => {
                completed_intake = true;
                self.step_event(from, Step::Freeform);
                self.dispatcher
                    .submit_profile(&self.session_id, self.machine.profile());
                prompts::advance(Step::Freeform, self.machine.profile())
            }
            Outcome::Rejected {
                field,
                candidate_chars,
            } => {
                TraceEvent::FieldRejected {
                    session_id: self.session_id.to_string(),
                    field: field.to_string(),
                    candidate_chars,
                }
                .emit();
                prompts::reprompt(field)
            }
            Outcome::Freeform => {
                let answer = self.topics.lookup(text);
                TraceEvent::TopicResolved {
                    session_id: self.session_id.to_string(),
                    matched: answer.is_some(),
                }
                .emit();
                answer.unwrap_or(self.topics.default_answer()).to_owned()
            }
        };

        let reply = Message::assistant(reply_text);
        self.push(reply.clone());

        Some(Turn {
            user,
            reply,
            step: self.machine.step(),
            completed_intake,
        })
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn step(&self) -> Step {
        self.machine.step()
    }

    pub fn profile(&self) -> &Profile {
        self.machine.profile()
    }

    /// Full transcript, greeting first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Quick-reply questions. Empty until intake is complete.
    pub fn suggestions(&self) -> Vec<String> {
        if self.step() != Step::Freeform {
            return Vec::new();
        }
        self.topics
            .questions()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    // ── helpers ──────────────────────────────────────────────────────

    /// Append to the transcript and record it with the current profile.
    fn push(&mut self, message: Message) {
        self.dispatcher.record(
            &self.session_id,
            &message,
            self.machine.profile(),
            &self.user_agent,
        );
        self.messages.push(message);
    }

    fn step_event(&self, from: Step, to: Step) {
        TraceEvent::StepAdvanced {
            session_id: self.session_id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
        .emit();
    }
}
