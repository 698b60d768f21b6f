use crate::DbPool;
use crate::models::{DbAvailability, DbProfile, DbService};
use crate::repositories::{availability, profile, service};
use agenda_core::models::availability::NewAvailability;
use agenda_core::models::profile::NewProfile;
use agenda_core::models::service::NewService;
use async_trait::async_trait;
use eyre::Result;
use mockall::automock;
use uuid::Uuid;

/// Persistence seam used by the HTTP layer
///
/// Every method takes the caller's identity as `owner` and only ever sees or
/// touches rows belonging to that owner.
#[automock]
#[async_trait]
pub trait AgendaStore: Send + Sync {
    async fn get_profile(&self, owner: Uuid) -> Result<Option<DbProfile>>;

    async fn profile_exists(&self, owner: Uuid) -> Result<bool>;

    /// Creates the profile with a fresh unique slug, or renames the existing one
    async fn upsert_profile(&self, owner: Uuid, profile: &NewProfile) -> Result<DbProfile>;

    /// Newest first
    async fn list_services(&self, owner: Uuid) -> Result<Vec<DbService>>;

    async fn get_service(&self, owner: Uuid, id: Uuid) -> Result<Option<DbService>>;

    async fn create_service(&self, owner: Uuid, service: &NewService) -> Result<DbService>;

    async fn update_service(&self, owner: Uuid, id: Uuid, service: &NewService) -> Result<Option<DbService>>;

    async fn delete_service(&self, owner: Uuid, id: Uuid) -> Result<bool>;

    /// Ordered by day of week, then start time
    async fn list_availabilities(&self, owner: Uuid) -> Result<Vec<DbAvailability>>;

    /// Atomically swaps the owner's availability set for `entries`
    async fn replace_availabilities(&self, owner: Uuid, entries: &[NewAvailability]) -> Result<Vec<DbAvailability>>;
}

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl AgendaStore for PgStore {
    async fn get_profile(&self, owner: Uuid) -> Result<Option<DbProfile>> {
        profile::get_profile_by_id(&self.pool, owner).await
    }

    async fn profile_exists(&self, owner: Uuid) -> Result<bool> {
        profile::profile_exists(&self.pool, owner).await
    }

    async fn upsert_profile(&self, owner: Uuid, new_profile: &NewProfile) -> Result<DbProfile> {
        profile::upsert_profile(&self.pool, owner, &new_profile.business_name, &new_profile.base_slug).await
    }

    async fn list_services(&self, owner: Uuid) -> Result<Vec<DbService>> {
        service::list_services(&self.pool, owner).await
    }

    async fn get_service(&self, owner: Uuid, id: Uuid) -> Result<Option<DbService>> {
        service::get_service(&self.pool, owner, id).await
    }

    async fn create_service(&self, owner: Uuid, new_service: &NewService) -> Result<DbService> {
        service::create_service(&self.pool, owner, &new_service.name, new_service.duration).await
    }

    async fn update_service(&self, owner: Uuid, id: Uuid, new_service: &NewService) -> Result<Option<DbService>> {
        service::update_service(&self.pool, owner, id, &new_service.name, new_service.duration).await
    }

    async fn delete_service(&self, owner: Uuid, id: Uuid) -> Result<bool> {
        service::delete_service(&self.pool, owner, id).await
    }

    async fn list_availabilities(&self, owner: Uuid) -> Result<Vec<DbAvailability>> {
        availability::list_availabilities(&self.pool, owner).await
    }

    async fn replace_availabilities(&self, owner: Uuid, entries: &[NewAvailability]) -> Result<Vec<DbAvailability>> {
        availability::replace_availabilities(&self.pool, owner, entries).await
    }
}
