//! AppState construction and background-task spawning extracted from `main.rs`.
//!
//! `serve` and `chat` share this boot path so a misconfigured topic table
//! or delivery section fails the same way in both.

use std::sync::Arc;

use anyhow::Context;

use cw_domain::config::Config;
use cw_intake::TopicTable;
use cw_sessions::{IdlePolicy, SessionStore};

use crate::state::AppState;

/// Validate config, load the topic table, wire delivery and return a
/// ready [`AppState`].
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        tracing::error!("config: {issue}");
    }
    if !issues.is_empty() {
        anyhow::bail!("config validation failed with {} error(s)", issues.len());
    }

    // ── Topic table ──────────────────────────────────────────────────
    let topics = Arc::new(
        TopicTable::load(config.widget.topics_path.as_deref()).context("loading topic table")?,
    );
    tracing::info!(topics = topics.len(), "topic table ready");

    // ── Delivery ─────────────────────────────────────────────────────
    let dispatcher =
        cw_delivery::create_dispatcher(&config.delivery).context("configuring delivery")?;
    tracing::info!(
        transport = ?config.delivery.transport,
        timeout_ms = config.delivery.timeout_ms,
        "delivery ready"
    );

    // ── Sessions ─────────────────────────────────────────────────────
    let sessions = Arc::new(SessionStore::new(topics.clone(), dispatcher.clone()));

    Ok(AppState {
        config,
        topics,
        dispatcher,
        sessions,
    })
}

/// Spawn long-running maintenance loops. Must be called from within a
/// tokio runtime.
pub fn spawn_background_tasks(state: &AppState) {
    // ── Periodic idle-session sweep ──────────────────────────────────
    let sessions = state.sessions.clone();
    let policy = IdlePolicy::new(state.config.widget.session_idle_minutes);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(policy.sweep_interval());
        loop {
            interval.tick().await;
            sessions.sweep_idle(&policy, chrono::Utc::now());
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_domain::config::DeliveryTransport;

    fn offline_config() -> Config {
        let mut cfg = Config::default();
        cfg.delivery.transport = DeliveryTransport::Disabled;
        cfg
    }

    #[test]
    fn boots_with_builtin_topics() {
        let state = build_app_state(Arc::new(offline_config())).unwrap();
        assert!(!state.topics.is_empty());
        assert!(state.sessions.is_empty());
    }

    #[test]
    fn invalid_config_is_refused() {
        let mut cfg = offline_config();
        cfg.widget.session_idle_minutes = 0;
        let err = build_app_state(Arc::new(cfg)).err().unwrap();
        assert!(err.to_string().contains("config validation failed"));
    }

    #[test]
    fn broken_topic_table_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topics.toml");
        std::fs::write(&path, "[[topic]]\nquestion = \"q\"\nanswer = \"a\"\n").unwrap();

        let mut cfg = offline_config();
        cfg.widget.topics_path = Some(path);
        let err = build_app_state(Arc::new(cfg)).err().unwrap();
        assert!(format!("{err:#}").contains("missing default"));
    }
}
