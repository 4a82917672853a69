//! Static topic table and the freeform answer resolver.
//!
//! The table is configuration: it is parsed and checked once at startup,
//! and a defect (missing default, duplicate question, …) is an error then
//! rather than a surprise on some later visitor's question.

use std::collections::HashMap;
use std::path::Path;

use cw_domain::error::{Error, Result};
use cw_domain::trace::TraceEvent;
use serde::Deserialize;

const BUILTIN: &str = include_str!("../topics.toml");

#[derive(Debug, Deserialize)]
struct TopicFile {
    default: Option<String>,
    #[serde(default, rename = "topic")]
    topics: Vec<TopicEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct TopicEntry {
    question: String,
    answer: String,
}

/// Question → canned answer lookup with a fallback answer.
#[derive(Debug, Clone)]
pub struct TopicTable {
    entries: Vec<TopicEntry>,
    index: HashMap<String, usize>,
    default_answer: String,
}

/// Lowercase and trim, the only normalization applied before lookup.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

impl TopicTable {
    /// The table compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN, "builtin")
    }

    /// Load `path` if given, otherwise the built-in table.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Self::builtin(),
            Some(p) => {
                let raw = std::fs::read_to_string(p).map_err(|e| {
                    Error::TopicTable(format!("reading {}: {e}", p.display()))
                })?;
                Self::from_toml_str(&raw, &p.display().to_string())
            }
        }
    }

    pub fn from_toml_str(raw: &str, source: &str) -> Result<Self> {
        let file: TopicFile = toml::from_str(raw)
            .map_err(|e| Error::TopicTable(format!("parsing {source}: {e}")))?;

        let default_answer = match file.default {
            Some(d) if !d.trim().is_empty() => d,
            Some(_) => {
                return Err(Error::TopicTable(format!("{source}: default answer is empty")))
            }
            None => {
                return Err(Error::TopicTable(format!("{source}: missing default answer")))
            }
        };

        let mut index = HashMap::with_capacity(file.topics.len());
        for (i, entry) in file.topics.iter().enumerate() {
            let key = normalize(&entry.question);
            if key.is_empty() {
                return Err(Error::TopicTable(format!(
                    "{source}: topic #{} has an empty question",
                    i + 1
                )));
            }
            if entry.answer.trim().is_empty() {
                return Err(Error::TopicTable(format!(
                    "{source}: answer for {key:?} is empty"
                )));
            }
            if index.insert(key.clone(), i).is_some() {
                return Err(Error::TopicTable(format!(
                    "{source}: duplicate question {key:?}"
                )));
            }
        }

        TraceEvent::TopicTableLoaded {
            source: source.to_owned(),
            topics: file.topics.len(),
        }
        .emit();

        Ok(Self {
            entries: file.topics,
            index,
            default_answer,
        })
    }

    /// Exact lookup on the normalized text; `None` on a miss.
    pub fn lookup(&self, text: &str) -> Option<&str> {
        self.index
            .get(&normalize(text))
            .map(|&i| self.entries[i].answer.as_str())
    }

    /// Answer for `text`, falling back to the default answer.
    pub fn resolve(&self, text: &str) -> &str {
        self.lookup(text).unwrap_or(&self.default_answer)
    }

    pub fn default_answer(&self) -> &str {
        &self.default_answer
    }

    /// Questions in table order, for quick-reply buttons.
    pub fn questions(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.question.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
default = "We'll get back to you."

[[topic]]
question = "How much do courses cost?"
answer = "From 4,999."
"#;

    #[test]
    fn builtin_table_loads() {
        let table = TopicTable::builtin().unwrap();
        assert!(!table.is_empty());
        assert!(table.lookup("how much do courses cost?").is_some());
    }

    #[test]
    fn lookup_is_case_and_edge_whitespace_insensitive() {
        let table = TopicTable::from_toml_str(SMALL, "test").unwrap();
        assert_eq!(table.resolve("  HOW MUCH do courses cost?\n"), "From 4,999.");
    }

    #[test]
    fn no_partial_or_fuzzy_matching() {
        let table = TopicTable::from_toml_str(SMALL, "test").unwrap();
        assert_eq!(table.resolve("how much do courses cost"), "We'll get back to you.");
        assert_eq!(table.resolve("courses cost?"), "We'll get back to you.");
        assert_eq!(table.resolve("asdkjh"), table.default_answer());
    }

    #[test]
    fn missing_default_fails_at_load() {
        let raw = r#"
[[topic]]
question = "q"
answer = "a"
"#;
        let err = TopicTable::from_toml_str(raw, "test").unwrap_err();
        assert!(matches!(err, Error::TopicTable(ref m) if m.contains("missing default")));
    }

    #[test]
    fn blank_default_fails_at_load() {
        let err = TopicTable::from_toml_str("default = \"  \"", "test").unwrap_err();
        assert!(err.to_string().contains("default answer is empty"));
    }

    #[test]
    fn questions_colliding_after_normalization_fail() {
        let raw = r#"
default = "d"

[[topic]]
question = "Hello?"
answer = "a"

[[topic]]
question = " hello? "
answer = "b"
"#;
        let err = TopicTable::from_toml_str(raw, "test").unwrap_err();
        assert!(err.to_string().contains("duplicate question"));
    }

    #[test]
    fn empty_answer_fails() {
        let raw = r#"
default = "d"

[[topic]]
question = "q"
answer = ""
"#;
        assert!(TopicTable::from_toml_str(raw, "test").is_err());
    }

    #[test]
    fn load_reads_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topics.toml");
        std::fs::write(&path, SMALL).unwrap();
        let table = TopicTable::load(Some(&path)).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.questions(), vec!["How much do courses cost?"]);
    }

    #[test]
    fn load_missing_file_is_topic_table_error() {
        let err = TopicTable::load(Some(Path::new("/nonexistent/topics.toml"))).unwrap_err();
        assert!(matches!(err, Error::TopicTable(_)));
    }
}
