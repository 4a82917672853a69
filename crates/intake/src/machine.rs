//! The intake state machine: NAME → EMAIL → PHONE → FREEFORM.
//!
//! There is no retry cap. A visitor who never supplies a valid value stays
//! on that step indefinitely; collection is never abandoned half-way.

use cw_domain::chat::{FieldKind, Profile, Step};

use crate::extract::extract;
use crate::validate::is_valid;

/// What a single input did to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `field` was captured and the machine moved on to another collecting step.
    Advanced { field: FieldKind, to: Step },
    /// The last field was captured; the profile is complete and the machine
    /// is now in `Freeform`. Produced exactly once per machine.
    Completed,
    /// The candidate for `field` failed validation. Nothing changed.
    Rejected { field: FieldKind, candidate_chars: usize },
    /// Collection is over; the input is a question for the answer resolver.
    Freeform,
}

#[derive(Debug, Clone, Default)]
pub struct IntakeMachine {
    step: Step,
    profile: Profile,
}

impl IntakeMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Feed one visitor message to the machine.
    pub fn advance(&mut self, raw: &str) -> Outcome {
        let Some(field) = self.step.field() else {
            return Outcome::Freeform;
        };

        let candidate = extract(raw, field);
        if !is_valid(&candidate, field) {
            return Outcome::Rejected {
                field,
                candidate_chars: candidate.chars().count(),
            };
        }

        // The slot for the current step is always empty: each step is
        // visited once and steps never regress.
        let written = self.profile.accept(field, candidate);
        debug_assert!(written, "{field} written twice");

        self.step = self.step.next();
        if self.step == Step::Freeform {
            Outcome::Completed
        } else {
            Outcome::Advanced {
                field,
                to: self.step,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_walks_all_steps() {
        let mut m = IntakeMachine::new();
        assert_eq!(m.step(), Step::CollectName);

        assert_eq!(
            m.advance("Hi I am John Smith"),
            Outcome::Advanced {
                field: FieldKind::Name,
                to: Step::CollectEmail
            }
        );
        assert_eq!(m.profile().name(), "John Smith");

        assert_eq!(
            m.advance("reach me at john@example.com please"),
            Outcome::Advanced {
                field: FieldKind::Email,
                to: Step::CollectPhone
            }
        );
        assert_eq!(m.profile().email(), "john@example.com");

        assert_eq!(m.advance("call 98 7654 3210"), Outcome::Completed);
        assert_eq!(m.step(), Step::Freeform);
        assert_eq!(m.profile().phone(), "9876543210");
        assert!(m.profile().is_complete());
    }

    #[test]
    fn rejection_keeps_step_and_profile() {
        let mut m = IntakeMachine::new();
        m.advance("Ada Lovelace");
        let before = m.profile().clone();

        let out = m.advance("not an email");
        assert_eq!(
            out,
            Outcome::Rejected {
                field: FieldKind::Email,
                candidate_chars: 12
            }
        );
        assert_eq!(m.step(), Step::CollectEmail);
        assert_eq!(m.profile(), &before);
        assert_eq!(m.profile().email(), "");
    }

    #[test]
    fn freeform_is_terminal() {
        let mut m = IntakeMachine::new();
        m.advance("Ada Lovelace");
        m.advance("ada@example.com");
        assert_eq!(m.advance("9876543210"), Outcome::Completed);

        for input in ["Grace Hopper", "grace@example.com", "1234567890", ""] {
            assert_eq!(m.advance(input), Outcome::Freeform);
            assert_eq!(m.step(), Step::Freeform);
        }
        assert_eq!(m.profile().name(), "Ada Lovelace");
        assert_eq!(m.profile().phone(), "9876543210");
    }

    #[test]
    fn stuck_field_loops_without_limit() {
        let mut m = IntakeMachine::new();
        m.advance("Ada Lovelace");
        for _ in 0..100 {
            assert!(matches!(m.advance("nope"), Outcome::Rejected { .. }));
        }
        assert_eq!(m.step(), Step::CollectEmail);
    }
}
