use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{dto::UserPayload, repo::User};
use crate::{auth::extractors::AuthGate, error::AppError, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    _gate: AuthGate,
) -> Result<Json<Vec<User>>, AppError> {
    let users = User::list(&state.db).await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    _gate: AuthGate,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    User::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    _gate: AuthGate,
    Json(payload): Json<UserPayload>,
) -> Result<(StatusCode, Json<User>), AppError> {
    if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(AppError::Validation("Name and email are required".into()));
    }
    let user = User::create(&state.db, payload.name.trim(), payload.email.trim())
        .await
        .map_err(AppError::from_user_insert)?;
    info!(user_id = %user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    _gate: AuthGate,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<User>, AppError> {
    if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(AppError::Validation("Name and email are required".into()));
    }
    User::update(&state.db, id, payload.name.trim(), payload.email.trim())
        .await
        .map_err(AppError::from_user_insert)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    _gate: AuthGate,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    User::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
