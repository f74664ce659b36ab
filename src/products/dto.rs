use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::Product;

/// Product as returned to clients. Raw image bytes are never serialized; the
/// database strategy is represented by `has_image` and the dedicated image
/// endpoint.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub has_image: bool,
    pub created_at: OffsetDateTime,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        let has_image = p.image_url.is_some() || p.image_data.is_some();
        Self {
            id: p.id,
            name: p.name,
            price: p.price,
            image_url: p.image_url,
            has_image,
            created_at: p.created_at,
        }
    }
}
