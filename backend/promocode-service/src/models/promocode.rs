use chrono::{DateTime, Utc};
use error_types::{ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A discount code owned by the user who created it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Promocode {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub creator_id: i64,
    pub discount: f64,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row to insert; `creator_id` is always the authenticated caller
#[derive(Debug, Clone, PartialEq)]
pub struct NewPromocode {
    pub name: String,
    pub description: String,
    pub creator_id: i64,
    pub discount: f64,
    pub code: String,
}

/// Replacement values for the mutable fields of a promocode
#[derive(Debug, Clone, PartialEq)]
pub struct PromocodeChanges {
    pub name: String,
    pub description: String,
    pub discount: f64,
    pub code: String,
}

/// Body of `POST /api/promocodes` and `PUT /api/promocodes/{id}`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PromocodeRequest {
    #[serde(default)]
    #[validate(length(min = 3, max = 100, message = "name must be 3-100 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "description must be at most 255 characters"))]
    pub description: String,
    #[validate(
        required(message = "discount is required"),
        range(min = 0.0, max = 100.0, message = "discount must be between 0 and 100")
    )]
    pub discount: Option<f64>,
    #[serde(default)]
    #[validate(length(min = 3, max = 50, message = "code must be 3-50 characters"))]
    pub code: String,
}

impl PromocodeRequest {
    /// Validate and turn the body into the replacement field set
    pub fn into_changes(self) -> ServiceResult<PromocodeChanges> {
        self.validate()?;
        let discount = match self.discount {
            Some(d) if d.is_finite() => d,
            _ => return Err(ServiceError::invalid_input("discount must be between 0 and 100")),
        };

        Ok(PromocodeChanges {
            name: self.name,
            description: self.description,
            discount,
            code: self.code,
        })
    }
}

/// Body of `GET /api/promocodes`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub items: Vec<Promocode>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// Body of `DELETE /api/promocodes/{id}`: the promocode as it was just
/// before it was removed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
    pub id: i64,
    pub name: String,
    pub creator_id: i64,
    pub discount: f64,
    pub code: String,
}

impl From<Promocode> for DeleteResponse {
    fn from(deleted: Promocode) -> Self {
        Self {
            success: true,
            message: "Promocode successfully deleted".into(),
            id: deleted.id,
            name: deleted.name,
            creator_id: deleted.creator_id,
            discount: deleted.discount,
            code: deleted.code,
        }
    }
}
