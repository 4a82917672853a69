//! Wire DTOs for the site backend's transcript and contact endpoints.

use cw_domain::chat::{Message, Profile, SessionId};
use serde::{Deserialize, Serialize};

/// One transcript line: a message plus the profile as it stood when the
/// message was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEntry {
    pub session_id: SessionId,
    pub message: Message,
    /// Possibly partial: fields not yet collected are empty strings.
    pub user_details: Profile,
    pub user_agent: String,
}

/// Body of the contact-registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Fixed marker identifying widget-originated leads.
    pub message: String,
}

impl ContactSubmission {
    pub fn from_profile(profile: &Profile, marker: &str) -> Self {
        Self {
            name: profile.name().to_owned(),
            email: profile.email().to_owned(),
            phone: profile.phone().to_owned(),
            message: marker.to_owned(),
        }
    }
}
