//! Best-effort field extraction from free-text replies.
//!
//! Extraction never fails: when nothing field-shaped is found the trimmed
//! (or, for phones, digit-stripped) input is returned and the validator
//! gets to reject it.

use std::sync::OnceLock;

use cw_domain::chat::FieldKind;
use regex::Regex;

/// Pull the most likely `kind` value out of `raw`.
pub fn extract(raw: &str, kind: FieldKind) -> String {
    match kind {
        FieldKind::Name => extract_name(raw),
        FieldKind::Email => extract_email(raw),
        FieldKind::Phone => extract_phone(raw),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Name
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const MAX_NAME_TOKENS: usize = 2;

fn greeting_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(?:hi|hello|hey|hiya|howdy|greetings|good\s+(?:morning|afternoon|evening))\b[\s,.!:-]*",
        )
        .expect("greeting pattern is valid")
    })
}

fn intro_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(?:my\s+name\s+is|my\s+name's|name\s+is|this\s+is|it\s+is|it's|i\s+am|i['’]m|call\s+me|i\s+go\s+by|myself)\b[\s,.!:-]*",
        )
        .expect("intro pattern is valid")
    })
}

/// Remove any stack of greetings and self-introductions from the front,
/// e.g. "Hi there, my name is" or "hello I'm".
fn strip_intro(raw: &str) -> &str {
    let mut rest = raw;
    loop {
        let before = rest.len();
        for re in [greeting_re(), intro_re()] {
            if let Some(m) = re.find(rest) {
                rest = &rest[m.end()..];
            }
        }
        // "hi there": drop the filler word after a greeting.
        if let Some(after) = strip_word(rest, "there") {
            rest = after;
        }
        if rest.len() == before {
            return rest;
        }
    }
}

fn strip_word<'a>(s: &'a str, word: &str) -> Option<&'a str> {
    let trimmed = s.trim_start();
    let head = trimmed.get(..word.len())?;
    if !head.eq_ignore_ascii_case(word) {
        return None;
    }
    let tail = &trimmed[word.len()..];
    match tail.chars().next() {
        None => Some(tail),
        Some(c) if !c.is_alphanumeric() => Some(tail.trim_start_matches([' ', ',', '.', '!', '-'])),
        Some(_) => None,
    }
}

/// Letters, optionally joined by an inner apostrophe or hyphen (O'Neil,
/// Mary-Jane). Digits and `@` never qualify.
fn is_name_token(token: &str) -> bool {
    token.chars().count() > 1
        && token.chars().next().is_some_and(char::is_alphabetic)
        && token.chars().last().is_some_and(char::is_alphabetic)
        && token
            .chars()
            .all(|c| c.is_alphabetic() || c == '\'' || c == '-')
}

fn extract_name(raw: &str) -> String {
    let tokens: Vec<&str> = strip_intro(raw)
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| matches!(c, '.' | ',' | '!' | '?' | ';' | ':' | '"')))
        .filter(|t| is_name_token(t))
        .take(MAX_NAME_TOKENS)
        .collect();

    if tokens.is_empty() {
        raw.trim().to_owned()
    } else {
        tokens.join(" ")
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Email
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
            .expect("email pattern is valid")
    })
}

fn extract_email(raw: &str) -> String {
    match email_re().find(raw) {
        Some(m) => m.as_str().to_owned(),
        None => raw.trim().to_owned(),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Phone
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const PHONE_DIGITS: usize = 10;

/// A run of digits held together by the separators people type inside
/// phone numbers: spaces, dashes, dots and parentheses.
fn phone_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\(?\d(?:[\d \-.()]*\d)?").expect("phone pattern is valid")
    })
}

fn digit_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("digit run pattern is valid"))
}

fn digits_of(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// First separated run holding exactly ten digits, else the first bare
/// ten-digit run (a country code or room number next to the number joins
/// the separated run), else every digit in the message.
fn extract_phone(raw: &str) -> String {
    phone_run_re()
        .find_iter(raw)
        .map(|m| digits_of(m.as_str()))
        .find(|digits| digits.len() == PHONE_DIGITS)
        .or_else(|| {
            digit_run_re()
                .find_iter(raw)
                .map(|m| m.as_str())
                .find(|run| run.len() == PHONE_DIGITS)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| digits_of(raw))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> String {
        extract(s, FieldKind::Name)
    }

    fn email(s: &str) -> String {
        extract(s, FieldKind::Email)
    }

    fn phone(s: &str) -> String {
        extract(s, FieldKind::Phone)
    }

    #[test]
    fn name_strips_greeting_and_intro() {
        assert_eq!(name("Hi I am John Smith"), "John Smith");
        assert_eq!(name("hello, my name is Priya"), "Priya");
        assert_eq!(name("Hey there! I'm Ana Lucia"), "Ana Lucia");
        assert_eq!(name("good morning, this is Omar"), "Omar");
    }

    #[test]
    fn name_takes_at_most_two_tokens() {
        assert_eq!(name("Mary Ann Evans"), "Mary Ann");
        assert_eq!(name("call me Ravi Kumar Sharma please"), "Ravi Kumar");
    }

    #[test]
    fn name_skips_digits_emails_and_single_letters() {
        assert_eq!(name("John 42 j@x.com Smith"), "John Smith");
        assert_eq!(name("J Smith"), "Smith");
    }

    #[test]
    fn name_keeps_apostrophes_and_hyphens() {
        assert_eq!(name("I'm Sinead O'Neil"), "Sinead O'Neil");
        assert_eq!(name("Mary-Jane Watson."), "Mary-Jane Watson");
    }

    #[test]
    fn bare_im_is_kept_as_a_surname() {
        assert_eq!(name("Im Soo-jin"), "Im Soo-jin");
        assert_eq!(name("hi, Im Soo-jin"), "Im Soo-jin");
        assert_eq!(name("I’m Soo-jin Im"), "Soo-jin Im");
    }

    #[test]
    fn name_without_qualifying_tokens_returns_trimmed_input() {
        assert_eq!(name("  12345  "), "12345");
        assert_eq!(name(" x "), "x");
    }

    #[test]
    fn greeting_alone_falls_back_to_input() {
        assert_eq!(name("hi"), "hi");
    }

    #[test]
    fn email_found_inside_sentence() {
        assert_eq!(
            email("reach me at john@example.com please"),
            "john@example.com"
        );
        assert_eq!(email("mine: a.b+tag@mail.co.uk."), "a.b+tag@mail.co.uk");
    }

    #[test]
    fn email_takes_first_match() {
        assert_eq!(email("a@one.io or b@two.io"), "a@one.io");
    }

    #[test]
    fn email_miss_returns_trimmed_input() {
        assert_eq!(email("  not an email "), "not an email");
        assert_eq!(email("john@localhost"), "john@localhost");
    }

    #[test]
    fn phone_ignores_separators() {
        assert_eq!(phone("call 98 7654 3210"), "9876543210");
        assert_eq!(phone("(987) 654-3210"), "9876543210");
        assert_eq!(phone("987.654.3210 anytime"), "9876543210");
    }

    #[test]
    fn phone_prefers_first_ten_digit_run() {
        assert_eq!(phone("ext 12, number 9876543210"), "9876543210");
    }

    #[test]
    fn phone_finds_bare_run_beside_other_digit_groups() {
        assert_eq!(phone("+91 9876543210"), "9876543210");
        assert_eq!(phone("room 4 9876543210"), "9876543210");
        assert_eq!(phone("9876543210 or 0"), "9876543210");
    }

    #[test]
    fn phone_miss_strips_non_digits_from_whole_message() {
        assert_eq!(phone("my number is 12345"), "12345");
        assert_eq!(phone("+91 98765 43210"), "919876543210");
        assert_eq!(phone("no digits"), "");
    }
}
