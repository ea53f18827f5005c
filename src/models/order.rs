use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::orders;

/// Initial status of every new order; the rest of the lifecycle is driven by
/// the farmer outside the creation path.
pub const STATUS_REQUESTED: &str = "REQUESTED";

/// An immutable-after-creation transaction record. The `_snap` fields are
/// copied from the listing and the active rate sheet at creation time and
/// never recomputed, so historical orders are immune to later price edits.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Order {
    pub id: Uuid,
    pub request_id: String,
    pub listing_id: Uuid,
    pub farmer_id: Uuid,
    pub restaurant_id: Uuid,
    pub quantity_kg: BigDecimal,
    pub size_request_text: String,
    pub time_band: String,
    pub time_detail: Option<String>,
    pub memo: Option<String>,
    pub requested_date: NaiveDate,
    pub expires_at: DateTime<Utc>,
    pub status: String,
    pub gutting_requested: bool,
    pub delivery_requested: bool,
    pub base_price_per_kg_snap: BigDecimal,
    pub gutting_price_per_kg_snap: BigDecimal,
    pub pricing_version_snap: Option<String>,
    pub alpha_rate_snap: BigDecimal,
    pub beta_rate_snap: BigDecimal,
    pub beta_discount_rate_snap: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrder {
    pub id: Uuid,
    pub request_id: String,
    pub listing_id: Uuid,
    pub farmer_id: Uuid,
    pub restaurant_id: Uuid,
    pub quantity_kg: BigDecimal,
    pub size_request_text: String,
    pub time_band: String,
    pub time_detail: Option<String>,
    pub memo: Option<String>,
    pub requested_date: NaiveDate,
    pub expires_at: DateTime<Utc>,
    pub status: String,
    pub gutting_requested: bool,
    pub delivery_requested: bool,
    pub base_price_per_kg_snap: BigDecimal,
    pub gutting_price_per_kg_snap: BigDecimal,
    pub pricing_version_snap: Option<String>,
    pub alpha_rate_snap: BigDecimal,
    pub beta_rate_snap: BigDecimal,
    pub beta_discount_rate_snap: BigDecimal,
}
