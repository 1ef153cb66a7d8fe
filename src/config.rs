use serde::Deserialize;

use crate::Result;

/// Repository settings chosen by the composition root
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupportConfig {
    /// Year stamped into every ticket number
    pub ticket_year: i32,
    /// First sequence handed out by an unseeded repository
    pub first_sequence: u64,
    /// Placeholder shown on the dashboard until response times are tracked
    pub avg_response_time: String,
    /// Reject status changes outside the ticket workflow
    pub enforce_transitions: bool,
    /// Load the sample tickets at startup
    pub seed_demo_data: bool,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            ticket_year: 2024,
            first_sequence: 1,
            avg_response_time: "2.4 hours".to_string(),
            enforce_transitions: false,
            seed_demo_data: false,
        }
    }
}

impl SupportConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: SupportConfig = serde_json::from_str(raw)?;
        tracing::debug!(?config, "Loaded support config");
        Ok(config)
    }
}
