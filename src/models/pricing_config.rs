use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::pricing_configs;

/// A versioned global rate sheet row. At most one row is active at a time;
/// the newest active row wins when operators leave several flagged.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = pricing_configs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PricingConfig {
    pub id: Uuid,
    pub pricing_version: String,
    pub alpha_rate: BigDecimal,
    pub beta_rate: BigDecimal,
    pub beta_discount_rate: BigDecimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = pricing_configs)]
pub struct NewPricingConfig {
    pub id: Uuid,
    pub pricing_version: String,
    pub alpha_rate: BigDecimal,
    pub beta_rate: BigDecimal,
    pub beta_discount_rate: BigDecimal,
    pub is_active: bool,
}

/// Point-in-time copy of the active rate sheet, loaded once per request and
/// passed by value into the quote and order-creation paths. The engine never
/// reads rate configuration as ambient state.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingSnapshot {
    pub pricing_version: Option<String>,
    pub alpha_rate: BigDecimal,
    pub beta_rate: BigDecimal,
    pub beta_discount_rate: BigDecimal,
}

impl Default for PricingSnapshot {
    /// No active rate sheet: zero rates, no version token.
    fn default() -> Self {
        PricingSnapshot {
            pricing_version: None,
            alpha_rate: BigDecimal::zero(),
            beta_rate: BigDecimal::zero(),
            beta_discount_rate: BigDecimal::zero(),
        }
    }
}

impl From<PricingConfig> for PricingSnapshot {
    fn from(config: PricingConfig) -> Self {
        PricingSnapshot {
            pricing_version: Some(config.pricing_version),
            alpha_rate: config.alpha_rate,
            beta_rate: config.beta_rate,
            beta_discount_rate: config.beta_discount_rate,
        }
    }
}

impl PricingSnapshot {
    /// The most recently updated active rate sheet as an immutable snapshot.
    pub fn load_active(conn: &mut PgConnection) -> QueryResult<PricingSnapshot> {
        let row = pricing_configs::table
            .filter(pricing_configs::is_active.eq(true))
            .order(pricing_configs::updated_at.desc())
            .select(PricingConfig::as_select())
            .first(conn)
            .optional()?;
        Ok(row.map(PricingSnapshot::from).unwrap_or_default())
    }
}
