use crate::models::{DbAvailability, DbProfile, DbService};
use crate::store::AgendaStore;
use agenda_core::models::availability::NewAvailability;
use agenda_core::models::profile::NewProfile;
use agenda_core::models::service::NewService;
use agenda_core::slug::slug_candidates;
use async_trait::async_trait;
use chrono::Utc;
use eyre::{Result, eyre};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    profiles: Vec<DbProfile>,
    // insertion order
    services: Vec<DbService>,
    availabilities: Vec<DbAvailability>,
}

/// In-memory store mirroring the Postgres behaviour, for tests
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of services across all owners
    pub async fn service_count(&self) -> usize {
        self.tables.lock().await.services.len()
    }
}

#[async_trait]
impl AgendaStore for MemoryStore {
    async fn get_profile(&self, owner: Uuid) -> Result<Option<DbProfile>> {
        let tables = self.tables.lock().await;
        Ok(tables.profiles.iter().find(|p| p.id == owner).cloned())
    }

    async fn profile_exists(&self, owner: Uuid) -> Result<bool> {
        let tables = self.tables.lock().await;
        Ok(tables.profiles.iter().any(|p| p.id == owner))
    }

    async fn upsert_profile(&self, owner: Uuid, new_profile: &NewProfile) -> Result<DbProfile> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();

        if let Some(existing) = tables.profiles.iter_mut().find(|p| p.id == owner) {
            existing.business_name = new_profile.business_name.clone();
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let slug = slug_candidates(&new_profile.base_slug)
            .find(|candidate| !tables.profiles.iter().any(|p| &p.unique_slug == candidate))
            .ok_or_else(|| eyre!("No free slug found for base '{}'", new_profile.base_slug))?;

        let profile = DbProfile {
            id: owner,
            business_name: new_profile.business_name.clone(),
            unique_slug: slug,
            created_at: now,
            updated_at: now,
        };
        tables.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn list_services(&self, owner: Uuid) -> Result<Vec<DbService>> {
        let tables = self.tables.lock().await;
        // Reverse first so equal timestamps still come out newest first
        let mut services: Vec<DbService> = tables
            .services
            .iter()
            .rev()
            .filter(|s| s.profile_id == owner)
            .cloned()
            .collect();
        services.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(services)
    }

    async fn get_service(&self, owner: Uuid, id: Uuid) -> Result<Option<DbService>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .services
            .iter()
            .find(|s| s.id == id && s.profile_id == owner)
            .cloned())
    }

    async fn create_service(&self, owner: Uuid, new_service: &NewService) -> Result<DbService> {
        let mut tables = self.tables.lock().await;

        if !tables.profiles.iter().any(|p| p.id == owner) {
            return Err(eyre!("Foreign key violation: profile {} does not exist", owner));
        }

        let now = Utc::now();
        let service = DbService {
            id: Uuid::new_v4(),
            profile_id: owner,
            name: new_service.name.clone(),
            duration: new_service.duration,
            created_at: now,
            updated_at: now,
        };
        tables.services.push(service.clone());
        Ok(service)
    }

    async fn update_service(&self, owner: Uuid, id: Uuid, new_service: &NewService) -> Result<Option<DbService>> {
        let mut tables = self.tables.lock().await;
        let Some(service) = tables
            .services
            .iter_mut()
            .find(|s| s.id == id && s.profile_id == owner)
        else {
            return Ok(None);
        };

        service.name = new_service.name.clone();
        service.duration = new_service.duration;
        service.updated_at = Utc::now();
        Ok(Some(service.clone()))
    }

    async fn delete_service(&self, owner: Uuid, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.services.len();
        tables.services.retain(|s| !(s.id == id && s.profile_id == owner));
        Ok(tables.services.len() < before)
    }

    async fn list_availabilities(&self, owner: Uuid) -> Result<Vec<DbAvailability>> {
        let tables = self.tables.lock().await;
        let mut availabilities: Vec<DbAvailability> = tables
            .availabilities
            .iter()
            .filter(|a| a.profile_id == owner)
            .cloned()
            .collect();
        availabilities.sort_by(|a, b| (a.day_of_week, &a.start_time).cmp(&(b.day_of_week, &b.start_time)));
        Ok(availabilities)
    }

    async fn replace_availabilities(&self, owner: Uuid, entries: &[NewAvailability]) -> Result<Vec<DbAvailability>> {
        let mut tables = self.tables.lock().await;

        if !tables.profiles.iter().any(|p| p.id == owner) {
            return Err(eyre!("Foreign key violation: profile {} does not exist", owner));
        }

        let now = Utc::now();
        let mut inserted: Vec<DbAvailability> = entries
            .iter()
            .map(|entry| DbAvailability {
                id: Uuid::new_v4(),
                profile_id: owner,
                day_of_week: entry.day_of_week,
                start_time: entry.start_time.clone(),
                end_time: entry.end_time.clone(),
                created_at: now,
            })
            .collect();

        // Single lock held for the swap, so readers never see a half-replaced set
        tables.availabilities.retain(|a| a.profile_id != owner);
        tables.availabilities.extend(inserted.iter().cloned());

        inserted.sort_by(|a, b| (a.day_of_week, &a.start_time).cmp(&(b.day_of_week, &b.start_time)));
        Ok(inserted)
    }
}
