//! # Service Handlers
//!
//! CRUD for the caller's appointment types. Single-service endpoints address
//! a row by id *and* owner: an id that does not parse, does not exist, or
//! belongs to another owner all produce the same 404.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;
use agenda_core::{
    errors::AgendaError,
    models::service::{DeleteServiceResponse, ServiceListResponse, ServiceRequest, ServiceResponse},
    validation::validate_service,
};
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth::AuthUser, error_handling::AppError},
};

fn service_not_found() -> AgendaError {
    AgendaError::NotFound("Service not found".to_string())
}

fn parse_service_id(raw: &str) -> Result<Uuid, AgendaError> {
    Uuid::parse_str(raw).map_err(|_| service_not_found())
}

/// Lists the caller's services, newest first
#[axum::debug_handler]
pub async fn list_services(
    auth: AuthUser,
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ServiceListResponse>, AppError> {
    let services = state
        .store
        .list_services(auth.user_id)
        .await
        .map_err(AgendaError::Database)?;

    Ok(Json(ServiceListResponse {
        services: services.into_iter().map(Into::into).collect(),
    }))
}

/// Creates a service for the caller
///
/// # Errors
///
/// * `AgendaError::Validation` - invalid name or duration
/// * `AgendaError::Precondition` - the caller has no profile yet
/// * `AgendaError::Database` - store failure
#[axum::debug_handler]
pub async fn create_service(
    auth: AuthUser,
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<ServiceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ServiceResponse>), AppError> {
    let Json(payload) = payload?;
    let new_service = validate_service(&payload)?;

    let has_profile = state
        .store
        .profile_exists(auth.user_id)
        .await
        .map_err(AgendaError::Database)?;
    if !has_profile {
        return Err(AgendaError::Precondition("You need to set up your profile first".to_string()).into());
    }

    let service = state
        .store
        .create_service(auth.user_id, &new_service)
        .await
        .map_err(AgendaError::Database)?;

    Ok((
        StatusCode::CREATED,
        Json(ServiceResponse {
            service: service.into(),
        }),
    ))
}

#[axum::debug_handler]
pub async fn get_service(
    auth: AuthUser,
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<ServiceResponse>, AppError> {
    let id = parse_service_id(&id)?;

    let service = state
        .store
        .get_service(auth.user_id, id)
        .await
        .map_err(AgendaError::Database)?
        .ok_or_else(service_not_found)?;

    Ok(Json(ServiceResponse {
        service: service.into(),
    }))
}

#[axum::debug_handler]
pub async fn update_service(
    auth: AuthUser,
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    payload: Result<Json<ServiceRequest>, JsonRejection>,
) -> Result<Json<ServiceResponse>, AppError> {
    let Json(payload) = payload?;
    let new_service = validate_service(&payload)?;
    let id = parse_service_id(&id)?;

    let service = state
        .store
        .update_service(auth.user_id, id, &new_service)
        .await
        .map_err(AgendaError::Database)?
        .ok_or_else(service_not_found)?;

    Ok(Json(ServiceResponse {
        service: service.into(),
    }))
}

#[axum::debug_handler]
pub async fn delete_service(
    auth: AuthUser,
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteServiceResponse>, AppError> {
    let id = parse_service_id(&id)?;

    let deleted = state
        .store
        .delete_service(auth.user_id, id)
        .await
        .map_err(AgendaError::Database)?;
    if !deleted {
        return Err(service_not_found().into());
    }

    Ok(Json(DeleteServiceResponse {
        message: "Service deleted successfully".to_string(),
    }))
}
