//! # Availability Handlers
//!
//! The caller's weekly availability is read and written as a whole set.
//! A save validates every entry first, then swaps the stored set in a single
//! store call; entries are never merged with what was there before.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;
use agenda_core::{
    errors::AgendaError,
    models::availability::{AvailabilityListResponse, AvailabilityRequest},
    validation::validate_availabilities,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth::AuthUser, error_handling::AppError},
};

async fn require_profile(state: &ApiState, owner: Uuid) -> Result<(), AgendaError> {
    let exists = state
        .store
        .profile_exists(owner)
        .await
        .map_err(AgendaError::Database)?;

    if exists {
        Ok(())
    } else {
        Err(AgendaError::NotFound("Profile not found".to_string()))
    }
}

/// Lists the caller's availability ordered by day, then start time
#[axum::debug_handler]
pub async fn list_availability(
    auth: AuthUser,
    State(state): State<Arc<ApiState>>,
) -> Result<Json<AvailabilityListResponse>, AppError> {
    require_profile(&state, auth.user_id).await?;

    let availabilities = state
        .store
        .list_availabilities(auth.user_id)
        .await
        .map_err(AgendaError::Database)?;

    Ok(Json(AvailabilityListResponse {
        availabilities: availabilities.into_iter().map(Into::into).collect(),
    }))
}

/// Replaces the caller's availability with the submitted list
///
/// An empty list clears it. Overlapping windows on the same day are stored
/// as given.
///
/// # Errors
///
/// * `AgendaError::Validation` - any entry is invalid; nothing is written
/// * `AgendaError::NotFound` - the caller has no profile
/// * `AgendaError::Database` - store failure; the previous set is kept
#[axum::debug_handler]
pub async fn replace_availability(
    auth: AuthUser,
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<AvailabilityRequest>, JsonRejection>,
) -> Result<Json<AvailabilityListResponse>, AppError> {
    let Json(payload) = payload?;
    let entries = validate_availabilities(&payload)?;

    require_profile(&state, auth.user_id).await?;

    let saved = state
        .store
        .replace_availabilities(auth.user_id, &entries)
        .await
        .map_err(AgendaError::Database)?;

    info!("Replaced availability for {}: {} entries", auth.user_id, saved.len());

    Ok(Json(AvailabilityListResponse {
        availabilities: saved.into_iter().map(Into::into).collect(),
    }))
}
