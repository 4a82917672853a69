use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Widget behaviour
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Pause before the assistant reply is shown ("typing…").
    /// Purely presentational: hosts apply it, the controller never sleeps.
    #[serde(default = "d_600")]
    pub reply_delay_ms: u64,
    /// Live sessions idle for longer than this are dropped.
    #[serde(default = "d_30")]
    pub session_idle_minutes: u64,
    /// Alternative topic table. When `None` the built-in table is used.
    #[serde(default)]
    pub topics_path: Option<PathBuf>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: 600,
            session_idle_minutes: 30,
            topics_path: None,
        }
    }
}

fn d_600() -> u64 {
    600
}
fn d_30() -> u64 {
    30
}
