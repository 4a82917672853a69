//! Assistant copy for the intake conversation.
//!
//! Every function here is deterministic in its inputs so the controller's
//! replies depend only on (step, validation result, profile).

use cw_domain::chat::{FieldKind, Profile, Step};

pub fn greeting() -> String {
    "Hi there! Before we get started, could you tell me your name?".to_owned()
}

/// Prompt shown after a field was accepted and the machine moved to `step`.
pub fn advance(step: Step, profile: &Profile) -> String {
    let who = profile.first_name().unwrap_or("there");
    match step {
        Step::CollectName => greeting(),
        Step::CollectEmail => {
            format!("Nice to meet you, {who}! What's the best email address to reach you at?")
        }
        Step::CollectPhone => {
            "Thanks! And what's your 10-digit phone number?".to_owned()
        }
        Step::Freeform => format!(
            "Thank you, {who}! Your details have been saved. \
             What would you like to know? You can ask about our courses, fees, or schedules."
        ),
    }
}

/// Prompt shown when a candidate for `kind` was rejected. Email and phone
/// prompts carry an example value.
pub fn reprompt(kind: FieldKind) -> String {
    match kind {
        FieldKind::Name => {
            "Sorry, I didn't quite catch that. Could you tell me your name?".to_owned()
        }
        FieldKind::Email => "That doesn't look like a valid email address. \
                             Please enter one like name@example.com."
            .to_owned(),
        FieldKind::Phone => "Please enter a valid 10-digit phone number, \
                             for example 9876543210."
            .to_owned(),
    }
}
