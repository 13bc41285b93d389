use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Date, Int4, Nullable, Numeric, Text};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::errors::AppError;

#[derive(Debug, Serialize, QueryableByName, ToSchema)]
pub struct SalesRow {
    #[diesel(sql_type = Text)]
    pub label: String,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub quantity_sold: Option<i64>,
    #[diesel(sql_type = Nullable<Numeric>)]
    #[schema(value_type = Option<String>)]
    pub revenue: Option<BigDecimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DateRangeParams {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    order_count: i64,
}

/// GET /reports/sales?start=YYYY-MM-DD&end=YYYY-MM-DD
///
/// Quantity sold and revenue per catalog item between two dates.
#[utoipa::path(
    get,
    path = "/reports/sales",
    params(
        ("start" = NaiveDate, Query, description = "First order date included"),
        ("end" = NaiveDate, Query, description = "Last order date included"),
    ),
    responses(
        (status = 200, description = "Per-item sales", body = [SalesRow]),
        (status = 403, description = "Admin role required"),
    ),
    tag = "reports"
)]
pub async fn sales_by_range(
    pool: web::Data<DbPool>,
    auth: AuthenticatedUser,
    query: web::Query<DateRangeParams>,
) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;
    let range = query.into_inner();

    let rows = web::block(move || {
        let mut conn = pool.get()?;
        let rows: Vec<SalesRow> = diesel::sql_query(
            "SELECT i.label,
                    SUM(l.quantity) AS quantity_sold,
                    SUM(l.quantity * i.unit_price) AS revenue
             FROM order_lines l
             JOIN catalog_items i ON i.id = l.item_id
             JOIN orders o ON o.id = l.order_id
             WHERE o.ordered_at BETWEEN $1 AND $2
             GROUP BY i.id, i.label
             ORDER BY i.label",
        )
        .bind::<Date, _>(range.start)
        .bind::<Date, _>(range.end)
        .load(&mut conn)?;
        Ok::<_, AppError>(rows)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(rows))
}

/// GET /reports/sales/{year}
///
/// Per-item sales for one year plus a grand-total row. The year is a bound
/// parameter, never spliced into the statement text.
#[utoipa::path(
    get,
    path = "/reports/sales/{year}",
    params(("year" = i32, Path, description = "Calendar year")),
    responses(
        (status = 200, description = "Per-item sales with a 'Total' row", body = [SalesRow]),
        (status = 403, description = "Admin role required"),
    ),
    tag = "reports"
)]
pub async fn sales_by_year(
    pool: web::Data<DbPool>,
    auth: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;
    let year = path.into_inner();

    let rows = web::block(move || {
        let mut conn = pool.get()?;
        let rows: Vec<SalesRow> = diesel::sql_query(
            "SELECT 'Total' AS label,
                    SUM(l.quantity) AS quantity_sold,
                    SUM(l.quantity * i.unit_price) AS revenue
             FROM order_lines l
             JOIN catalog_items i ON i.id = l.item_id
             JOIN orders o ON o.id = l.order_id
             WHERE o.ordered_at >= make_date($1, 1, 1)
               AND o.ordered_at < make_date($1 + 1, 1, 1)
             UNION ALL
             SELECT i.label,
                    SUM(l.quantity),
                    SUM(l.quantity * i.unit_price)
             FROM order_lines l
             JOIN catalog_items i ON i.id = l.item_id
             JOIN orders o ON o.id = l.order_id
             WHERE o.ordered_at >= make_date($1, 1, 1)
               AND o.ordered_at < make_date($1 + 1, 1, 1)
             GROUP BY i.id, i.label",
        )
        .bind::<Int4, _>(year)
        .load(&mut conn)?;
        Ok::<_, AppError>(rows)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(rows))
}

/// GET /reports/orders/{year}
#[utoipa::path(
    get,
    path = "/reports/orders/{year}",
    params(("year" = i32, Path, description = "Calendar year")),
    responses(
        (status = 200, description = "Number of orders placed that year"),
        (status = 403, description = "Admin role required"),
    ),
    tag = "reports"
)]
pub async fn order_count_by_year(
    pool: web::Data<DbPool>,
    auth: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;
    let year = path.into_inner();

    let count = web::block(move || {
        let mut conn = pool.get()?;
        let row: CountRow = diesel::sql_query(
            "SELECT COUNT(*) AS order_count
             FROM orders
             WHERE ordered_at >= make_date($1, 1, 1)
               AND ordered_at < make_date($1 + 1, 1, 1)",
        )
        .bind::<Int4, _>(year)
        .get_result(&mut conn)?;
        Ok::<_, AppError>(row.order_count)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(json!({ "order_count": count })))
}
