use actix_web::{web, HttpResponse};
use bigdecimal::{BigDecimal, Zero};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::engine::idempotency::insert_or_fetch;
use crate::engine::quote::display_unit_price;
use crate::engine::tier_format::{tier_summary, DefaultTierFormatter};
use crate::errors::AppError;
use crate::identity::{Identity, Role};
use crate::models::delivery_fee_tier::{DeliveryFeeTier, NewDeliveryFeeTier};
use crate::models::listing::{Listing, NewListing};
use crate::models::pricing_config::PricingSnapshot;
use crate::schema::{delivery_fee_tiers, listings};

use super::{non_negative_decimal, optional_non_negative_decimal};

/// Unique index backing the listing idempotency token.
const LISTING_REQUEST_ID_CONSTRAINT: &str = "listings_request_id_key";

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTierRequest {
    /// Distance band label, e.g. "0-5km"
    pub label: String,
    /// Decimal fee as a string to avoid floating-point issues, e.g. "2.50"
    pub fee: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateListingRequest {
    /// Client-generated idempotency token. A resubmitted form must carry the
    /// same token; a fresh one is minted when the field is blank.
    pub request_id: Option<String>,
    pub fish_type: String,
    pub base_price_per_kg: String,
    #[serde(default)]
    pub gutting_available: bool,
    pub gutting_price_per_kg: Option<String>,
    #[serde(default)]
    pub delivery_available: bool,
    /// Delivery fee tiers in display order; sort order is assigned from the
    /// position in this list.
    #[serde(default)]
    pub tiers: Vec<CreateTierRequest>,
    pub free_delivery_min_kg: Option<String>,
    pub min_order_kg: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetListingActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingResponse {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub fish_type: String,
    pub base_price_per_kg: String,
    /// Alpha-inclusive price restaurants actually see.
    pub display_price_per_kg: String,
    pub gutting_available: bool,
    pub gutting_price_per_kg: String,
    pub delivery_available: bool,
    pub delivery_fee_tiers_label: String,
    pub free_delivery_min_kg: Option<String>,
    pub min_order_kg: Option<String>,
    pub photo_url: Option<String>,
    pub is_active: bool,
    pub updated_at: String,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /listings
///
/// Creates a listing together with its delivery fee tiers in one
/// transaction. Keyed by the client's `request_id`: a retried submission
/// with the same token returns the already-created listing instead of a
/// duplicate.
#[utoipa::path(
    post,
    path = "/listings",
    request_body = CreateListingRequest,
    responses(
        (status = 201, description = "Listing created"),
        (status = 200, description = "Listing already created by an earlier submission with the same token"),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Caller is not a farmer"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "listings"
)]
pub async fn create_listing(
    pool: web::Data<DbPool>,
    identity: Identity,
    body: web::Json<CreateListingRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require_role(Role::Farmer)?;
    let body = body.into_inner();

    let fish_type = body.fish_type.trim().to_string();
    if fish_type.is_empty() {
        return Err(AppError::InvalidRequest("fish_type is required".to_string()));
    }
    let request_id = body
        .request_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let base_price_per_kg = non_negative_decimal(&body.base_price_per_kg, "base_price_per_kg")?;
    let gutting_price_per_kg = optional_non_negative_decimal(
        body.gutting_price_per_kg.as_deref(),
        "gutting_price_per_kg",
    )?
    .unwrap_or_else(BigDecimal::zero);
    let free_delivery_min_kg =
        optional_non_negative_decimal(body.free_delivery_min_kg.as_deref(), "free_delivery_min_kg")?;
    let min_order_kg = optional_non_negative_decimal(body.min_order_kg.as_deref(), "min_order_kg")?;

    let mut tiers: Vec<(String, BigDecimal, i32)> = Vec::with_capacity(body.tiers.len());
    for (index, tier) in body.tiers.iter().enumerate() {
        let label = tier.label.trim().to_string();
        if label.is_empty() {
            return Err(AppError::InvalidRequest("tier label is required".to_string()));
        }
        let fee = non_negative_decimal(&tier.fee, "tier fee")?;
        tiers.push((label, fee, index as i32 + 1));
    }

    let new_listing = NewListing {
        id: Uuid::new_v4(),
        request_id: request_id.clone(),
        farmer_id: identity.user_id,
        fish_type,
        base_price_per_kg,
        gutting_available: body.gutting_available,
        gutting_price_per_kg,
        delivery_available: body.delivery_available,
        free_delivery_min_kg,
        min_order_kg,
        photo_url: body.photo_url.map(|url| url.trim().to_string()).filter(|url| !url.is_empty()),
        is_active: true,
    };

    let outcome = web::block(move || {
        let mut conn = pool.get()?;

        let outcome = insert_or_fetch(
            &mut conn,
            LISTING_REQUEST_ID_CONSTRAINT,
            |conn| {
                conn.transaction(|conn| {
                    let listing: Listing = diesel::insert_into(listings::table)
                        .values(&new_listing)
                        .returning(Listing::as_returning())
                        .get_result(conn)?;

                    let new_tiers: Vec<NewDeliveryFeeTier> = tiers
                        .iter()
                        .map(|(label, fee, sort_order)| NewDeliveryFeeTier {
                            id: Uuid::new_v4(),
                            listing_id: listing.id,
                            label: label.clone(),
                            fee: fee.clone(),
                            sort_order: *sort_order,
                        })
                        .collect();
                    diesel::insert_into(delivery_fee_tiers::table)
                        .values(&new_tiers)
                        .execute(conn)?;

                    Ok(listing)
                })
            },
            |conn| {
                listings::table
                    .filter(listings::request_id.eq(&request_id))
                    .select(Listing::as_select())
                    .first(conn)
            },
        )?;

        Ok::<_, AppError>(outcome)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let was_created = outcome.was_created();
    let listing = outcome.into_inner();
    let body = json!({ "id": listing.id });
    if was_created {
        Ok(HttpResponse::Created().json(body))
    } else {
        Ok(HttpResponse::Ok().json(body))
    }
}

/// GET /listings
///
/// Farmers see their own listings; restaurants see every active listing with
/// the alpha-inclusive display price computed against the current rate sheet.
#[utoipa::path(
    get,
    path = "/listings",
    responses(
        (status = 200, description = "Listings visible to the caller", body = [ListingResponse]),
        (status = 401, description = "No resolved identity"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "listings"
)]
pub async fn list_listings(
    pool: web::Data<DbPool>,
    identity: Identity,
) -> Result<HttpResponse, AppError> {
    let result = web::block(move || {
        let mut conn = pool.get()?;

        let rows: Vec<Listing> = match identity.role {
            Role::Farmer => listings::table
                .filter(listings::farmer_id.eq(identity.user_id))
                .order(listings::updated_at.desc())
                .select(Listing::as_select())
                .load(&mut conn)?,
            Role::Restaurant => listings::table
                .filter(listings::is_active.eq(true))
                .order(listings::updated_at.desc())
                .select(Listing::as_select())
                .load(&mut conn)?,
        };

        let pricing = PricingSnapshot::load_active(&mut conn)?;

        let tiers: Vec<DeliveryFeeTier> = DeliveryFeeTier::belonging_to(&rows)
            .select(DeliveryFeeTier::as_select())
            .load(&mut conn)?;
        let tiers_by_listing = tiers.grouped_by(&rows);

        let items: Vec<ListingResponse> = rows
            .into_iter()
            .zip(tiers_by_listing)
            .map(|(listing, listing_tiers)| {
                let entries: Vec<_> = listing_tiers.iter().map(DeliveryFeeTier::to_entry).collect();
                ListingResponse {
                    id: listing.id,
                    farmer_id: listing.farmer_id,
                    fish_type: listing.fish_type,
                    display_price_per_kg: display_unit_price(
                        &listing.base_price_per_kg,
                        &pricing.alpha_rate,
                    )
                    .to_string(),
                    base_price_per_kg: listing.base_price_per_kg.to_string(),
                    gutting_available: listing.gutting_available,
                    gutting_price_per_kg: listing.gutting_price_per_kg.to_string(),
                    delivery_available: listing.delivery_available,
                    delivery_fee_tiers_label: tier_summary(&entries, &DefaultTierFormatter),
                    free_delivery_min_kg: listing.free_delivery_min_kg.map(|v| v.to_string()),
                    min_order_kg: listing.min_order_kg.map(|v| v.to_string()),
                    photo_url: listing.photo_url,
                    is_active: listing.is_active,
                    updated_at: listing.updated_at.to_rfc3339(),
                }
            })
            .collect();

        Ok::<_, AppError>(items)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(result))
}

/// PUT /listings/{id}/active
///
/// Activates or deactivates a listing. Scoped to the owning farmer; another
/// farmer's listing behaves as if it does not exist.
#[utoipa::path(
    put,
    path = "/listings/{id}/active",
    params(
        ("id" = Uuid, Path, description = "Listing UUID"),
    ),
    request_body = SetListingActiveRequest,
    responses(
        (status = 200, description = "Listing updated"),
        (status = 403, description = "Caller is not a farmer"),
        (status = 404, description = "Listing not found or owned by someone else"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "listings"
)]
pub async fn set_listing_active(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<SetListingActiveRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require_role(Role::Farmer)?;
    let listing_id = path.into_inner();
    let is_active = body.into_inner().is_active;

    let updated = web::block(move || {
        let mut conn = pool.get()?;
        let updated = diesel::update(
            listings::table
                .filter(listings::id.eq(listing_id))
                .filter(listings::farmer_id.eq(identity.user_id)),
        )
        .set(listings::is_active.eq(is_active))
        .execute(&mut conn)?;
        Ok::<_, AppError>(updated)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    if updated == 0 {
        return Err(AppError::NotFound);
    }
    Ok(HttpResponse::Ok().json(json!({ "id": listing_id, "is_active": is_active })))
}
