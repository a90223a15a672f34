use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{Genre, Item, User},
    services::{RecommendationSource, ServiceKind},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub age: i64,
    pub genres: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetServiceRequest {
    pub kind: ServiceKind,
}

#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    pub kind: ServiceKind,
    pub name: String,
}

impl From<ServiceKind> for ServiceResponse {
    fn from(kind: ServiceKind) -> Self {
        Self {
            kind,
            name: kind.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub items: Vec<Item>,
    pub count: usize,
    pub source: RecommendationSource,
    pub message: String,
    pub served_at: DateTime<Utc>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Labels of every selectable genre
pub async fn list_genres() -> Json<Vec<&'static str>> {
    Json(Genre::ALL.iter().map(|g| g.display_name()).collect())
}

/// Create the current user
///
/// At least one genre is required; unknown genre labels are rejected.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let genres = request
        .genres
        .iter()
        .map(|label| label.parse::<Genre>())
        .collect::<AppResult<Vec<Genre>>>()?;

    if genres.is_empty() {
        return Err(AppError::InvalidArgument(
            "Select at least one genre".to_string(),
        ));
    }

    let mut controller = state.controller.write().await;
    controller.create_user(&request.name, request.age)?;
    controller.add_genres_to_current_user(&genres)?;

    let user = controller
        .current_user()
        .cloned()
        .ok_or_else(|| AppError::Internal("User vanished after creation".to_string()))?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Get the current user
pub async fn get_user(State(state): State<AppState>) -> AppResult<Json<User>> {
    let controller = state.controller.read().await;
    controller
        .current_user()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No current user".to_string()))
}

/// Forget the current user
pub async fn clear_user(State(state): State<AppState>) -> StatusCode {
    state.controller.write().await.clear_current_user();
    StatusCode::NO_CONTENT
}

/// Get the active service variant
pub async fn get_service(State(state): State<AppState>) -> Json<ServiceResponse> {
    let controller = state.controller.read().await;
    Json(ServiceResponse::from(controller.active_kind()))
}

/// Switch the active service variant
pub async fn set_service(
    State(state): State<AppState>,
    Json(request): Json<SetServiceRequest>,
) -> AppResult<Json<ServiceResponse>> {
    let mut controller = state.controller.write().await;
    controller.set_active_service(request.kind)?;
    Ok(Json(ServiceResponse::from(controller.active_kind())))
}

/// Recommendations for the current user
///
/// The controller blocks for the engine's whole run, so the call is moved
/// to the blocking pool. It cannot be cancelled once the engine starts.
pub async fn get_recommendations(
    State(state): State<AppState>,
) -> AppResult<Json<RecommendationsResponse>> {
    let recommendation = tokio::task::spawn_blocking(move || {
        let controller = state.controller.blocking_read();
        controller.recommend_for_current_user()
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let message = recommendation.message();

    Ok(Json(RecommendationsResponse {
        count: recommendation.items.len(),
        items: recommendation.items,
        source: recommendation.source,
        message,
        served_at: Utc::now(),
    }))
}
