mod delivery;
mod observability;
mod server;
mod widget;

pub use delivery::*;
pub use observability::*;
pub use server::*;
pub use widget::*;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Sanity checks that serde cannot express.
    ///
    /// Returns one human-readable issue per problem; an empty vector means
    /// the configuration is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.delivery.timeout_ms == 0 {
            issues.push("delivery.timeout_ms must be greater than zero".to_owned());
        }
        if self.delivery.transport == DeliveryTransport::Rest {
            let base = self.delivery.base_url.trim();
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                issues.push(format!(
                    "delivery.base_url must be an http(s) URL, got {base:?}"
                ));
            }
            for (key, path) in [
                ("delivery.transcript_path", &self.delivery.transcript_path),
                ("delivery.contact_path", &self.delivery.contact_path),
            ] {
                if !path.starts_with('/') {
                    issues.push(format!("{key} must start with '/', got {path:?}"));
                }
            }
        }
        if self.delivery.contact_marker.trim().is_empty() {
            issues.push("delivery.contact_marker must not be empty".to_owned());
        }
        if let Some(rl) = &self.server.rate_limit {
            if rl.requests_per_second == 0 || rl.burst_size == 0 {
                issues.push(
                    "server.rate_limit: requests_per_second and burst_size must be > 0".to_owned(),
                );
            }
        }
        if self.widget.session_idle_minutes == 0 {
            issues.push("widget.session_idle_minutes must be greater than zero".to_owned());
        }
        if !(0.0..=1.0).contains(&self.observability.sample_rate) {
            issues.push(format!(
                "observability.sample_rate must be within 0.0..=1.0, got {}",
                self.observability.sample_rate
            ));
        }

        issues
    }
}
