use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{dto::IngredientPayload, repo::Ingredient};
use crate::{
    auth::extractors::AuthGate, error::AppError, products::repo::Product, state::AppState,
};

pub fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route("/ingredients", get(list_ingredients).post(create_ingredient))
        .route(
            "/ingredients/:id",
            put(update_ingredient).delete(delete_ingredient),
        )
        .route(
            "/products/:id/ingredients",
            get(list_product_ingredients).post(attach_ingredient),
        )
        .route(
            "/products/:id/ingredients/:ingredient_id",
            delete(detach_ingredient),
        )
}

fn validated_name(payload: &IngredientPayload) -> Result<&str, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    Ok(name)
}

#[instrument(skip(state))]
pub async fn list_ingredients(
    State(state): State<AppState>,
    _gate: AuthGate,
) -> Result<Json<Vec<Ingredient>>, AppError> {
    let ingredients = Ingredient::list(&state.db).await?;
    Ok(Json(ingredients))
}

#[instrument(skip(state, payload))]
pub async fn create_ingredient(
    State(state): State<AppState>,
    _gate: AuthGate,
    Json(payload): Json<IngredientPayload>,
) -> Result<(StatusCode, Json<Ingredient>), AppError> {
    let name = validated_name(&payload)?;
    let ingredient = Ingredient::get_or_create(&state.db, name).await?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}

#[instrument(skip(state, payload))]
pub async fn update_ingredient(
    State(state): State<AppState>,
    _gate: AuthGate,
    Path(id): Path<Uuid>,
    Json(payload): Json<IngredientPayload>,
) -> Result<Json<Ingredient>, AppError> {
    let name = validated_name(&payload)?;
    Ingredient::update(&state.db, id, name)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Ingredient not found".into()))
}

#[instrument(skip(state))]
pub async fn delete_ingredient(
    State(state): State<AppState>,
    _gate: AuthGate,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    Ingredient::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn list_product_ingredients(
    State(state): State<AppState>,
    _gate: AuthGate,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Ingredient>>, AppError> {
    let ingredients = Ingredient::list_for_product(&state.db, id).await?;
    Ok(Json(ingredients))
}

/// Attach by name; the ingredient row is created implicitly when missing.
#[instrument(skip(state, payload))]
pub async fn attach_ingredient(
    State(state): State<AppState>,
    _gate: AuthGate,
    Path(id): Path<Uuid>,
    Json(payload): Json<IngredientPayload>,
) -> Result<(StatusCode, Json<Ingredient>), AppError> {
    let name = validated_name(&payload)?;

    if Product::find_by_id(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound("Product not found".into()));
    }

    let ingredient = Ingredient::get_or_create(&state.db, name).await?;
    Ingredient::attach(&state.db, id, ingredient.id).await?;
    info!(product_id = %id, ingredient_id = %ingredient.id, "ingredient attached");
    Ok((StatusCode::CREATED, Json(ingredient)))
}

#[instrument(skip(state))]
pub async fn detach_ingredient(
    State(state): State<AppState>,
    _gate: AuthGate,
    Path((id, ingredient_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    Ingredient::detach(&state.db, id, ingredient_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
