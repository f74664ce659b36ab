use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::ProductResponse,
    repo::Product,
    services::{self, ImageUpload},
};
use crate::{auth::extractors::AuthGate, error::AppError, state::AppState};

/// No content-type sniffing: stored bytes are assumed to be JPEG.
const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/:id/image", get(get_product_image))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

/// Multipart fields accepted by create and update.
#[derive(Default)]
struct ProductForm {
    name: Option<String>,
    price: Option<Decimal>,
    image: Option<ImageUpload>,
    image_url: Option<String>,
}

async fn parse_form(mut mp: Multipart) -> Result<ProductForm, AppError> {
    let mut form = ProductForm::default();
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string());
        match field_name.as_deref() {
            Some("name") => {
                form.name = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| AppError::Validation("invalid name field".into()))?,
                );
            }
            Some("price") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|_| AppError::Validation("invalid price field".into()))?;
                let price = raw
                    .trim()
                    .parse::<Decimal>()
                    .map_err(|_| AppError::Validation("Price must be a number".into()))?;
                form.price = Some(price);
            }
            Some("image") => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "upload".into());
                let body = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::Validation("invalid image field".into()))?;
                form.image = Some(ImageUpload { body, filename });
            }
            Some("image_url") => {
                form.image_url = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| AppError::Validation("invalid image_url field".into()))?,
                );
            }
            _ => {} // unknown fields are ignored
        }
    }
    Ok(form)
}

fn required(form: &ProductForm) -> Result<(String, Decimal), AppError> {
    let name = form
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Validation("Name is required".into()))?;
    let price = form
        .price
        .ok_or_else(|| AppError::Validation("Price is required".into()))?;
    if price < Decimal::ZERO {
        return Err(AppError::Validation("Price must be non-negative".into()));
    }
    Ok((name.to_string(), price))
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    _gate: AuthGate,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = Product::list(&state.db).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    _gate: AuthGate,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, AppError> {
    Product::find_by_id(&state.db, id)
        .await?
        .map(|p| Json(p.into()))
        .ok_or_else(|| AppError::NotFound("Product not found".into()))
}

#[instrument(skip(state, mp))]
pub async fn create_product(
    State(state): State<AppState>,
    _gate: AuthGate,
    mp: Multipart,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    let form = parse_form(mp).await?;
    let (name, price) = required(&form)?;

    let product = services::create_product(&state, &name, price, form.image).await?;
    info!(product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(product.into())))
}

#[instrument(skip(state, mp))]
pub async fn update_product(
    State(state): State<AppState>,
    _gate: AuthGate,
    Path(id): Path<Uuid>,
    mp: Multipart,
) -> Result<Json<ProductResponse>, AppError> {
    let form = parse_form(mp).await?;
    let (name, price) = required(&form)?;

    services::update_product(&state, id, &name, price, form.image, form.image_url)
        .await?
        .map(|p| Json(p.into()))
        .ok_or_else(|| AppError::NotFound("Product not found".into()))
}

#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    _gate: AuthGate,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    services::delete_product(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Streams the row's bytes for the database storage strategy. Products whose
/// reference is a URL resolve at the web boundary instead.
#[instrument(skip(state))]
pub async fn get_product_image(
    State(state): State<AppState>,
    _gate: AuthGate,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = Product::image_bytes(&state.db, id)
        .await?
        .flatten()
        .ok_or_else(|| AppError::NotFound("Image not found".into()))?;
    Ok(([(header::CONTENT_TYPE, IMAGE_CONTENT_TYPE)], bytes))
}
