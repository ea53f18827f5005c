use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::listings;

/// A farmer's standing offer. Mutated only by its owner; orders snapshot the
/// prices they saw, so edits never affect already-created orders.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Listing {
    pub id: Uuid,
    pub request_id: String,
    pub farmer_id: Uuid,
    pub fish_type: String,
    pub base_price_per_kg: BigDecimal,
    pub gutting_available: bool,
    pub gutting_price_per_kg: BigDecimal,
    pub delivery_available: bool,
    pub free_delivery_min_kg: Option<BigDecimal>,
    pub min_order_kg: Option<BigDecimal>,
    pub photo_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = listings)]
pub struct NewListing {
    pub id: Uuid,
    pub request_id: String,
    pub farmer_id: Uuid,
    pub fish_type: String,
    pub base_price_per_kg: BigDecimal,
    pub gutting_available: bool,
    pub gutting_price_per_kg: BigDecimal,
    pub delivery_available: bool,
    pub free_delivery_min_kg: Option<BigDecimal>,
    pub min_order_kg: Option<BigDecimal>,
    pub photo_url: Option<String>,
    pub is_active: bool,
}
