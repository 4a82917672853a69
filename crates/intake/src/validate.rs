//! Per-field acceptance rules. Pure and deterministic.

use std::sync::OnceLock;

use cw_domain::chat::FieldKind;
use regex::Regex;

const MIN_NAME_CHARS: usize = 2;
const PHONE_DIGITS: usize = 10;

fn email_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email shape is valid"))
}

/// Decide whether `candidate` is an acceptable `kind` value.
pub fn is_valid(candidate: &str, kind: FieldKind) -> bool {
    match kind {
        FieldKind::Name => candidate.trim().chars().count() >= MIN_NAME_CHARS,
        FieldKind::Email => email_shape().is_match(candidate),
        FieldKind::Phone => {
            candidate.chars().filter(char::is_ascii_digit).count() == PHONE_DIGITS
        }
    }
}
