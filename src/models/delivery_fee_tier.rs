use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::tier_format::TierEntry;
use crate::schema::delivery_fee_tiers;

/// A distance band and its delivery fee, owned by a listing. Created with the
/// listing and never mutated independently; the farmer picks the concrete
/// tier after the order is placed.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = delivery_fee_tiers)]
#[diesel(belongs_to(crate::models::listing::Listing, foreign_key = listing_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DeliveryFeeTier {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub label: String,
    pub fee: BigDecimal,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl DeliveryFeeTier {
    pub fn to_entry(&self) -> TierEntry {
        TierEntry {
            label: self.label.clone(),
            fee: self.fee.clone(),
            sort_order: self.sort_order,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = delivery_fee_tiers)]
pub struct NewDeliveryFeeTier {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub label: String,
    pub fee: BigDecimal,
    pub sort_order: i32,
}
