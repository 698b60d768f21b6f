use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A business owner's profile. `id` is the owner's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub business_name: String,
    pub unique_slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub business_name: Value,
}

/// A validated profile write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub business_name: String,
    /// Slug derived from the name, before uniqueness suffixes
    pub base_slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: Profile,
}
