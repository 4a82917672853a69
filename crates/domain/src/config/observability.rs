use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// [observability]
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Span export for `chatwidget serve`.
///
/// The widget host always logs JSON to stdout. Pointing `otlp_endpoint`
/// at a collector also ships the request and delivery spans there, so a
/// lost lead can be followed from `POST /messages` to the contact call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Collector address, gRPC (`http://otel-collector:4317`). Unset or
    /// blank keeps export off.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,

    /// Reported as `service.name`.
    #[serde(default = "d_service_name")]
    pub service_name: String,

    /// Fraction of traces kept, `0.0..=1.0`.
    #[serde(default = "d_sample_rate")]
    pub sample_rate: f64,
}

impl ObservabilityConfig {
    /// The collector to export to, if export is on.
    pub fn export_endpoint(&self) -> Option<&str> {
        self.otlp_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: None,
            service_name: d_service_name(),
            sample_rate: d_sample_rate(),
        }
    }
}

fn d_service_name() -> String {
    "chatwidget".into()
}

fn d_sample_rate() -> f64 {
    1.0
}
