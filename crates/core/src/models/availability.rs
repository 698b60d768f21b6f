use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A recurring weekly window in which a profile accepts bookings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub id: Uuid,
    pub profile_id: Uuid,
    /// 0 = Sunday ... 6 = Saturday
    pub day_of_week: i16,
    /// `HH:MM`, 24-hour
    pub start_time: String,
    /// `HH:MM`, 24-hour, strictly after `start_time`
    pub end_time: String,
    pub created_at: DateTime<Utc>,
}

/// Replacement set for a profile's availability
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    #[serde(default)]
    pub availabilities: Value,
}

/// A validated availability entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAvailability {
    pub day_of_week: i16,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityListResponse {
    pub availabilities: Vec<Availability>,
}
