use agenda_core::models::{availability::Availability, profile::Profile, service::Service};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProfile {
    pub id: Uuid,
    pub business_name: String,
    pub unique_slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub name: String,
    pub duration: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailability {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub day_of_week: i16,
    pub start_time: String,
    pub end_time: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbProfile> for Profile {
    fn from(row: DbProfile) -> Self {
        Profile {
            id: row.id,
            business_name: row.business_name,
            unique_slug: row.unique_slug,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<DbService> for Service {
    fn from(row: DbService) -> Self {
        Service {
            id: row.id,
            profile_id: row.profile_id,
            name: row.name,
            duration: row.duration,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<DbAvailability> for Availability {
    fn from(row: DbAvailability) -> Self {
        Availability {
            id: row.id,
            profile_id: row.profile_id,
            day_of_week: row.day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
            created_at: row.created_at,
        }
    }
}
