use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Date, Nullable, Numeric, Text};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::auth::AuthenticatedUser;
use crate::domain::order::{OrderDraft, OrderLineInput, OrderView};
use crate::errors::AppError;
use crate::models::catalog_item::CatalogItem;
use crate::models::order::Order;
use crate::models::order_line::OrderLine;
use crate::schema::{catalog_items, order_lines, orders};
use crate::AppOrderService;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderLineRequest {
    pub item_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub payment_id: Uuid,
    pub address_id: Uuid,
    /// Defaults to today when omitted.
    pub ordered_at: Option<NaiveDate>,
    pub lines: Vec<CreateOrderLineRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub item_id: Uuid,
    pub label: String,
    pub quantity: i32,
    pub unit_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub payment_id: Uuid,
    pub address_id: Uuid,
    pub ordered_at: NaiveDate,
    pub invoice_name: String,
    pub invoice_path: Option<String>,
    pub created_at: String,
    pub lines: Vec<OrderLineResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(view: OrderView) -> Self {
        OrderResponse {
            id: view.id,
            customer_id: view.customer_id,
            payment_id: view.payment_id,
            address_id: view.address_id,
            ordered_at: view.ordered_at,
            invoice_name: view.invoice_name,
            invoice_path: view.invoice_path,
            created_at: view.created_at.to_rfc3339(),
            lines: view
                .lines
                .into_iter()
                .map(|l| OrderLineResponse {
                    item_id: l.item_id,
                    label: l.label,
                    quantity: l.quantity,
                    unit_price: l.unit_price.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, QueryableByName, ToSchema)]
pub struct OrderSummaryRow {
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: Uuid,
    #[diesel(sql_type = Date)]
    pub ordered_at: NaiveDate,
    #[diesel(sql_type = Text)]
    pub invoice_name: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub invoice_path: Option<String>,
    #[diesel(sql_type = Text)]
    pub customer_name: String,
    #[diesel(sql_type = Text)]
    pub delivery_address: String,
    #[diesel(sql_type = Numeric)]
    #[schema(value_type = String)]
    pub total_pre_tax: BigDecimal,
    #[diesel(sql_type = Numeric)]
    #[schema(value_type = String)]
    pub total_incl_tax: BigDecimal,
    #[diesel(sql_type = Text)]
    pub line_summary: String,
}

const ORDER_SUMMARY_SQL: &str = "\
SELECT o.id,
       o.ordered_at,
       o.invoice_name,
       o.invoice_path,
       u.first_name || ' ' || u.last_name AS customer_name,
       a.street || ', ' || a.city || ', ' || a.postal_code || ', ' || a.country AS delivery_address,
       SUM(l.quantity * i.unit_price) AS total_pre_tax,
       SUM(l.quantity * i.unit_price) * 1.20 AS total_incl_tax,
       STRING_AGG(i.label || ' x ' || l.quantity, ', ') AS line_summary
FROM orders o
JOIN users u ON u.id = o.customer_id
JOIN addresses a ON a.id = o.address_id
JOIN order_lines l ON l.order_id = o.id
JOIN catalog_items i ON i.id = l.item_id";

const ORDER_SUMMARY_GROUP: &str = "\
GROUP BY o.id, u.first_name, u.last_name, a.street, a.city, a.postal_code, a.country
ORDER BY o.ordered_at DESC";

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Runs the whole intake: validation, header and line inserts, invoice
/// rendering and the invoice-path update, committed as one unit. A failure
/// in any step leaves no trace.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created, invoice rendered"),
        (status = 400, description = "Empty cart or invalid quantity"),
        (status = 403, description = "Caller may not order for this customer"),
        (status = 404, description = "Unknown customer, payment, address or item"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<AppOrderService>,
    auth: AuthenticatedUser,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    auth.require_customer(body.customer_id)?;

    let draft = OrderDraft {
        customer_id: body.customer_id,
        payment_id: body.payment_id,
        address_id: body.address_id,
        ordered_at: body.ordered_at.unwrap_or_else(|| Utc::now().date_naive()),
        lines: body
            .lines
            .into_iter()
            .map(|l| OrderLineInput {
                item_id: l.item_id,
                quantity: l.quantity,
            })
            .collect(),
    };

    let created = web::block(move || service.create_order(draft))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(json!({
        "message": "order created",
        "id": created.id,
        "invoice_path": created.invoice_path,
        "total_pre_tax": created.total_pre_tax.to_string(),
        "total_incl_tax": created.total_incl_tax.to_string(),
    })))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order with its lines", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<AppOrderService>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let view = web::block(move || service.get_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let Some(view) = view else {
        return Err(AppError::NotFound);
    };
    auth.require_customer(view.customer_id)?;

    Ok(HttpResponse::Ok().json(OrderResponse::from(view)))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub label: String,
    pub description: String,
    pub quantity: i32,
    pub unit_price: String,
}

/// GET /orders/{id}/items
#[utoipa::path(
    get,
    path = "/orders/{id}/items",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Resolved line items", body = [OrderItemResponse]),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order_items(
    pool: web::Data<DbPool>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let items = web::block(move || {
        let mut conn = pool.get()?;
        let order = orders::table
            .find(order_id)
            .select(Order::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or(AppError::NotFound)?;
        auth.require_customer(order.customer_id)?;

        let rows: Vec<(OrderLine, CatalogItem)> = order_lines::table
            .inner_join(catalog_items::table)
            .filter(order_lines::order_id.eq(order_id))
            .select((OrderLine::as_select(), CatalogItem::as_select()))
            .load(&mut conn)?;
        Ok::<_, AppError>(
            rows.into_iter()
                .map(|(line, item)| OrderItemResponse {
                    label: item.label,
                    description: item.description,
                    quantity: line.quantity,
                    unit_price: item.unit_price.to_string(),
                })
                .collect::<Vec<_>>(),
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(items))
}

/// GET /orders
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "Every order with computed totals", body = [OrderSummaryRow]),
        (status = 403, description = "Admin role required"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    pool: web::Data<DbPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;

    let rows = web::block(move || {
        let mut conn = pool.get()?;
        let rows: Vec<OrderSummaryRow> =
            diesel::sql_query(format!("{ORDER_SUMMARY_SQL}\n{ORDER_SUMMARY_GROUP}"))
                .load(&mut conn)?;
        Ok::<_, AppError>(rows)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(rows))
}

/// GET /orders/customer/{customer_id}
#[utoipa::path(
    get,
    path = "/orders/customer/{customer_id}",
    params(("customer_id" = Uuid, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Orders of one customer", body = [OrderSummaryRow]),
        (status = 403, description = "Not this customer"),
    ),
    tag = "orders"
)]
pub async fn list_orders_by_customer(
    pool: web::Data<DbPool>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    auth.require_customer(customer_id)?;

    let rows = web::block(move || {
        let mut conn = pool.get()?;
        let rows: Vec<OrderSummaryRow> = diesel::sql_query(format!(
            "{ORDER_SUMMARY_SQL}\nWHERE o.customer_id = $1\n{ORDER_SUMMARY_GROUP}"
        ))
        .bind::<diesel::sql_types::Uuid, _>(customer_id)
        .load(&mut conn)?;
        Ok::<_, AppError>(rows)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(rows))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DateRangeParams {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// GET /orders/customer/{customer_id}/range?start=YYYY-MM-DD&end=YYYY-MM-DD
#[utoipa::path(
    get,
    path = "/orders/customer/{customer_id}/range",
    params(
        ("customer_id" = Uuid, Path, description = "Customer id"),
        ("start" = NaiveDate, Query, description = "First order date included"),
        ("end" = NaiveDate, Query, description = "Last order date included"),
    ),
    responses(
        (status = 200, description = "Orders of one customer within the dates", body = [OrderSummaryRow]),
        (status = 403, description = "Not this customer"),
    ),
    tag = "orders"
)]
pub async fn list_orders_by_customer_range(
    pool: web::Data<DbPool>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
    query: web::Query<DateRangeParams>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    auth.require_customer(customer_id)?;
    let range = query.into_inner();

    let rows = web::block(move || {
        let mut conn = pool.get()?;
        let rows: Vec<OrderSummaryRow> = diesel::sql_query(format!(
            "{ORDER_SUMMARY_SQL}\nWHERE o.customer_id = $1 AND o.ordered_at BETWEEN $2 AND $3\n{ORDER_SUMMARY_GROUP}"
        ))
        .bind::<diesel::sql_types::Uuid, _>(customer_id)
        .bind::<Date, _>(range.start)
        .bind::<Date, _>(range.end)
        .load(&mut conn)?;
        Ok::<_, AppError>(rows)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(rows))
}

/// DELETE /orders/{id}
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order and its lines deleted"),
        (status = 404, description = "Order not found"),
        (status = 403, description = "Admin role required"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    service: web::Data<AppOrderService>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;
    let order_id = path.into_inner();

    let deleted = web::block(move || service.delete_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    if !deleted {
        return Err(AppError::NotFound);
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "order deleted" })))
}
