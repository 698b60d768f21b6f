use axum::{Json, extract::State, extract::rejection::JsonRejection};
use std::sync::Arc;
use agenda_core::{
    errors::AgendaError,
    models::profile::{ProfileRequest, ProfileResponse},
    validation::validate_profile,
};
use tracing::info;

use crate::{
    ApiState,
    middleware::{auth::AuthUser, error_handling::AppError},
};

#[axum::debug_handler]
pub async fn get_profile(
    auth: AuthUser,
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state
        .store
        .get_profile(auth.user_id)
        .await
        .map_err(AgendaError::Database)?
        .ok_or_else(|| AgendaError::NotFound("Profile not found".to_string()))?;

    Ok(Json(ProfileResponse {
        profile: profile.into(),
    }))
}

/// Creates the caller's profile on first save, renames it afterwards
///
/// A new profile gets a slug derived from the business name, suffixed with
/// `-1`, `-2`, ... when taken. Renaming never changes the slug.
#[axum::debug_handler]
pub async fn upsert_profile(
    auth: AuthUser,
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>, AppError> {
    let Json(payload) = payload?;
    let new_profile = validate_profile(&payload)?;

    let profile = state
        .store
        .upsert_profile(auth.user_id, &new_profile)
        .await
        .map_err(AgendaError::Database)?;

    info!("Saved profile {} (slug {})", profile.id, profile.unique_slug);

    Ok(Json(ProfileResponse {
        profile: profile.into(),
    }))
}
