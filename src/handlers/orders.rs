use actix_web::{web, HttpResponse};
use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::engine::idempotency::insert_or_fetch;
use crate::engine::quote::{compute_quote, display_unit_price, lenient_decimal, QuoteInput};
use crate::engine::tier_format::delivery_fee_bounds;
use crate::engine::time_window::{resolve_window, TimeBand, WindowRequest};
use crate::errors::AppError;
use crate::identity::{Identity, Role};
use crate::models::delivery_fee_tier::DeliveryFeeTier;
use crate::models::listing::Listing;
use crate::models::order::{NewOrder, Order, STATUS_REQUESTED};
use crate::models::pricing_config::PricingSnapshot;
use crate::schema::{delivery_fee_tiers, listings, orders};

use super::positive_decimal;

/// Unique index backing the order idempotency token.
const ORDER_REQUEST_ID_CONSTRAINT: &str = "orders_request_id_key";

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct EstimateRequest {
    pub listing_id: Uuid,
    /// Decimal quantity as a string; blank or malformed input estimates as
    /// zero so a half-filled form still renders.
    pub quantity_kg: Option<String>,
    #[serde(default)]
    pub gutting_requested: bool,
    #[serde(default)]
    pub delivery_requested: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EstimateResponse {
    pub display_unit_price_per_kg: String,
    pub fish_subtotal: String,
    pub gutting_fee: String,
    pub support_fee: String,
    pub delivery_min: String,
    pub delivery_max: String,
    pub total_min: String,
    pub total_max: String,
    pub is_range: bool,
    pub free_delivery_applied: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    /// Client-generated idempotency token. A resubmitted form must carry the
    /// same token; a fresh one is minted when the field is blank.
    pub request_id: Option<String>,
    pub listing_id: Uuid,
    /// Decimal quantity as a string to avoid floating-point issues, e.g. "7.5"
    pub quantity_kg: String,
    pub size_request_text: String,
    /// MORNING | AFTERNOON | NIGHT
    pub time_band: String,
    /// 0 = today, 1 = tomorrow, 2 = day after, counted in the reference
    /// timezone. Ignored when `selected_date` is present.
    pub day_offset: Option<i64>,
    /// Explicit calendar date (YYYY-MM-DD); wins over `day_offset`.
    pub selected_date: Option<String>,
    pub time_detail: Option<String>,
    pub memo: Option<String>,
    #[serde(default)]
    pub gutting_requested: bool,
    #[serde(default)]
    pub delivery_requested: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub farmer_id: Uuid,
    pub restaurant_id: Uuid,
    pub quantity_kg: String,
    pub size_request_text: String,
    pub time_band: String,
    pub time_detail: Option<String>,
    pub memo: Option<String>,
    pub requested_date: String,
    pub expires_at: String,
    pub status: String,
    pub gutting_requested: bool,
    pub delivery_requested: bool,
    pub base_price_per_kg_snap: String,
    pub gutting_price_per_kg_snap: String,
    pub pricing_version_snap: Option<String>,
    pub alpha_rate_snap: String,
    pub beta_rate_snap: String,
    pub beta_discount_rate_snap: String,
    pub created_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id,
            listing_id: order.listing_id,
            farmer_id: order.farmer_id,
            restaurant_id: order.restaurant_id,
            quantity_kg: order.quantity_kg.to_string(),
            size_request_text: order.size_request_text,
            time_band: order.time_band,
            time_detail: order.time_detail,
            memo: order.memo,
            requested_date: order.requested_date.to_string(),
            expires_at: order.expires_at.to_rfc3339(),
            status: order.status,
            gutting_requested: order.gutting_requested,
            delivery_requested: order.delivery_requested,
            base_price_per_kg_snap: order.base_price_per_kg_snap.to_string(),
            gutting_price_per_kg_snap: order.gutting_price_per_kg_snap.to_string(),
            pricing_version_snap: order.pricing_version_snap,
            alpha_rate_snap: order.alpha_rate_snap.to_string(),
            beta_rate_snap: order.beta_rate_snap.to_string(),
            beta_discount_rate_snap: order.beta_discount_rate_snap.to_string(),
            created_at: order.created_at.to_rfc3339(),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders/estimate
///
/// Live cost breakdown for the order form. Runs the same calculator the
/// creation path snapshots from, so the number the restaurant sees is the
/// number that gets frozen. Malformed quantity input estimates as zero
/// rather than failing.
#[utoipa::path(
    post,
    path = "/orders/estimate",
    request_body = EstimateRequest,
    responses(
        (status = 200, description = "Cost breakdown", body = EstimateResponse),
        (status = 403, description = "Caller is not a restaurant"),
        (status = 404, description = "Listing not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn estimate_order(
    pool: web::Data<DbPool>,
    identity: Identity,
    body: web::Json<EstimateRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require_role(Role::Restaurant)?;
    let body = body.into_inner();

    let result = web::block(move || {
        let mut conn = pool.get()?;

        let listing = listings::table
            .filter(listings::id.eq(body.listing_id))
            .select(Listing::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or(AppError::NotFound)?;

        let tiers: Vec<DeliveryFeeTier> = delivery_fee_tiers::table
            .filter(delivery_fee_tiers::listing_id.eq(listing.id))
            .select(DeliveryFeeTier::as_select())
            .load(&mut conn)?;
        let entries: Vec<_> = tiers.iter().map(DeliveryFeeTier::to_entry).collect();
        let (delivery_fee_min, delivery_fee_max) = delivery_fee_bounds(&entries);

        let pricing = PricingSnapshot::load_active(&mut conn)?;
        let unit_price = display_unit_price(&listing.base_price_per_kg, &pricing.alpha_rate);

        let quote = compute_quote(&QuoteInput {
            quantity_kg: lenient_decimal(body.quantity_kg.as_deref()),
            display_unit_price_per_kg: unit_price.clone(),
            gutting_requested: body.gutting_requested && listing.gutting_available,
            gutting_price_per_kg: listing.gutting_price_per_kg.clone(),
            beta_rate: pricing.beta_rate.clone(),
            delivery_requested: body.delivery_requested && listing.delivery_available,
            delivery_fee_min,
            delivery_fee_max,
            free_delivery_min_kg: listing.free_delivery_min_kg.clone(),
        });

        Ok::<_, AppError>(EstimateResponse {
            display_unit_price_per_kg: unit_price.to_string(),
            fish_subtotal: quote.fish_subtotal.to_string(),
            gutting_fee: quote.gutting_fee.to_string(),
            support_fee: quote.support_fee.to_string(),
            delivery_min: quote.delivery_min.to_string(),
            delivery_max: quote.delivery_max.to_string(),
            total_min: quote.total_min.to_string(),
            total_max: quote.total_max.to_string(),
            is_range: quote.is_range,
            free_delivery_applied: quote.free_delivery_applied,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(result))
}

/// POST /orders
///
/// Validates the time selection against "now" in the reference timezone,
/// freezes the pricing snapshot, and inserts the order keyed by the client's
/// `request_id`. A retried submission with the same token returns the
/// already-created order.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 200, description = "Order already created by an earlier submission with the same token", body = OrderResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Caller is not a restaurant"),
        (status = 404, description = "Listing not found"),
        (status = 422, description = "Requested time window has already passed"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    pool: web::Data<DbPool>,
    identity: Identity,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require_role(Role::Restaurant)?;
    let body = body.into_inner();

    let quantity_kg = positive_decimal(&body.quantity_kg, "quantity_kg")?;
    let size_request_text = body.size_request_text.trim().to_string();
    if size_request_text.is_empty() {
        return Err(AppError::InvalidRequest("size_request_text is required".to_string()));
    }
    let band = TimeBand::parse(&body.time_band).ok_or_else(|| {
        AppError::InvalidRequest("time_band must be MORNING, AFTERNOON or NIGHT".to_string())
    })?;
    let selection = WindowRequest::from_selection(band, body.day_offset, body.selected_date.as_deref())?;
    let window = resolve_window(selection, Utc::now())?;

    let request_id = body
        .request_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let time_detail = body.time_detail.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let memo = body.memo.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    let outcome = web::block(move || {
        let mut conn = pool.get()?;

        let listing = listings::table
            .filter(listings::id.eq(body.listing_id))
            .select(Listing::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or(AppError::NotFound)?;

        // Capabilities the listing does not offer cannot be requested.
        let gutting_requested = body.gutting_requested && listing.gutting_available;
        let delivery_requested = body.delivery_requested && listing.delivery_available;

        let pricing = PricingSnapshot::load_active(&mut conn)?;

        let new_order = NewOrder {
            id: Uuid::new_v4(),
            request_id: request_id.clone(),
            listing_id: listing.id,
            farmer_id: listing.farmer_id,
            restaurant_id: identity.user_id,
            quantity_kg,
            size_request_text,
            time_band: band.as_str().to_string(),
            time_detail,
            memo,
            requested_date: window.requested_date,
            expires_at: window.expires_at,
            status: STATUS_REQUESTED.to_string(),
            gutting_requested,
            delivery_requested,
            base_price_per_kg_snap: listing.base_price_per_kg,
            gutting_price_per_kg_snap: listing.gutting_price_per_kg,
            pricing_version_snap: pricing.pricing_version,
            alpha_rate_snap: pricing.alpha_rate,
            beta_rate_snap: pricing.beta_rate,
            beta_discount_rate_snap: pricing.beta_discount_rate,
        };

        let outcome = insert_or_fetch(
            &mut conn,
            ORDER_REQUEST_ID_CONSTRAINT,
            |conn| {
                diesel::insert_into(orders::table)
                    .values(&new_order)
                    .returning(Order::as_returning())
                    .get_result(conn)
            },
            |conn| {
                orders::table
                    .filter(orders::request_id.eq(&request_id))
                    .select(Order::as_select())
                    .first(conn)
            },
        )?;

        Ok::<_, AppError>(outcome)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let was_created = outcome.was_created();
    let response = OrderResponse::from(outcome.into_inner());
    if was_created {
        Ok(HttpResponse::Created().json(response))
    } else {
        Ok(HttpResponse::Ok().json(response))
    }
}

/// GET /orders/{id}
///
/// Returns the order with its frozen pricing snapshot. Visible only to the
/// two parties on the order; anyone else sees a 404.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let result = web::block(move || {
        let mut conn = pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(order_id))
            .select(Order::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok::<_, AppError>(None);
        };
        if order.farmer_id != identity.user_id && order.restaurant_id != identity.user_id {
            return Ok(None);
        }
        Ok(Some(OrderResponse::from(order)))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    match result {
        Some(order) => Ok(HttpResponse::Ok().json(order)),
        None => Err(AppError::NotFound),
    }
}

/// GET /orders
///
/// Paginated list scoped to the caller: farmers see orders placed against
/// their listings, restaurants see orders they placed.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 401, description = "No resolved identity"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    pool: web::Data<DbPool>,
    identity: Identity,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);
    let offset = (page - 1) * limit;

    let result = web::block(move || {
        let mut conn = pool.get()?;

        conn.transaction::<_, AppError, _>(|conn| {
            // The caller sees one side of the order, never the whole table.
            let scope = || -> Box<
                dyn BoxableExpression<orders::table, diesel::pg::Pg, SqlType = diesel::sql_types::Bool>,
            > {
                match identity.role {
                    Role::Farmer => Box::new(orders::farmer_id.eq(identity.user_id)),
                    Role::Restaurant => Box::new(orders::restaurant_id.eq(identity.user_id)),
                }
            };

            let total: i64 = orders::table.filter(scope()).count().get_result(conn)?;

            let rows = orders::table
                .filter(scope())
                .select(Order::as_select())
                .order(orders::created_at.desc())
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(ListOrdersResponse {
                items: rows.into_iter().map(OrderResponse::from).collect(),
                total,
                page,
                limit,
            })
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(result))
}
