use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::catalog_item::{CatalogItem, NewCatalogItem};
use crate::models::category::Category;
use crate::schema::{catalog_items, categories};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertItemRequest {
    pub label: String,
    pub description: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
    pub released_on: NaiveDate,
    pub category_id: Uuid,
    pub image_path: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemResponse {
    pub id: Uuid,
    pub label: String,
    pub description: String,
    pub unit_price: String,
    pub released_on: NaiveDate,
    pub category_id: Uuid,
    pub category_label: Option<String>,
    pub image_path: Option<String>,
}

impl ItemResponse {
    fn from_item(item: CatalogItem, category_label: Option<String>) -> Self {
        ItemResponse {
            id: item.id,
            label: item.label,
            description: item.description,
            unit_price: item.unit_price.to_string(),
            released_on: item.released_on,
            category_id: item.category_id,
            category_label,
            image_path: item.image_path,
        }
    }
}

fn parse_price(raw: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(raw)
        .map_err(|_| AppError::Validation(format!("'{raw}' is not a valid price")))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /catalog
#[utoipa::path(
    get,
    path = "/catalog",
    responses((status = 200, description = "All catalog items with their category", body = [ItemResponse])),
    tag = "catalog"
)]
pub async fn list_items(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let items = web::block(move || {
        let mut conn = pool.get()?;
        let rows: Vec<(CatalogItem, Category)> = catalog_items::table
            .inner_join(categories::table)
            .select((CatalogItem::as_select(), Category::as_select()))
            .order(catalog_items::label.asc())
            .load(&mut conn)?;
        Ok::<_, AppError>(
            rows.into_iter()
                .map(|(item, category)| ItemResponse::from_item(item, Some(category.label)))
                .collect::<Vec<_>>(),
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(items))
}

/// GET /catalog/category/{category_id}
#[utoipa::path(
    get,
    path = "/catalog/category/{category_id}",
    params(("category_id" = Uuid, Path, description = "Category id")),
    responses((status = 200, description = "Items in the category", body = [ItemResponse])),
    tag = "catalog"
)]
pub async fn list_items_by_category(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let category_id = path.into_inner();

    let items = web::block(move || {
        let mut conn = pool.get()?;
        let rows: Vec<(CatalogItem, Category)> = catalog_items::table
            .inner_join(categories::table)
            .filter(catalog_items::category_id.eq(category_id))
            .select((CatalogItem::as_select(), Category::as_select()))
            .load(&mut conn)?;
        Ok::<_, AppError>(
            rows.into_iter()
                .map(|(item, category)| ItemResponse::from_item(item, Some(category.label)))
                .collect::<Vec<_>>(),
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(items))
}

/// POST /catalog
#[utoipa::path(
    post,
    path = "/catalog",
    request_body = UpsertItemRequest,
    responses(
        (status = 201, description = "Item created"),
        (status = 400, description = "Invalid price"),
        (status = 403, description = "Admin role required"),
    ),
    tag = "catalog"
)]
pub async fn create_item(
    pool: web::Data<DbPool>,
    auth: AuthenticatedUser,
    body: web::Json<UpsertItemRequest>,
) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;
    let body = body.into_inner();
    let unit_price = parse_price(&body.unit_price)?;

    let id = Uuid::new_v4();
    web::block(move || {
        let mut conn = pool.get()?;
        diesel::insert_into(catalog_items::table)
            .values(&NewCatalogItem {
                id,
                label: body.label,
                description: body.description,
                unit_price,
                released_on: body.released_on,
                category_id: body.category_id,
                image_path: body.image_path,
            })
            .execute(&mut conn)?;
        Ok::<_, AppError>(())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(json!({ "message": "item created", "id": id })))
}

/// PATCH /catalog/{id}
#[utoipa::path(
    patch,
    path = "/catalog/{id}",
    params(("id" = Uuid, Path, description = "Item id")),
    request_body = UpsertItemRequest,
    responses(
        (status = 200, description = "Item updated"),
        (status = 404, description = "Item not found"),
        (status = 403, description = "Admin role required"),
    ),
    tag = "catalog"
)]
pub async fn update_item(
    pool: web::Data<DbPool>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<UpsertItemRequest>,
) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;
    let item_id = path.into_inner();
    let body = body.into_inner();
    let unit_price = parse_price(&body.unit_price)?;

    let updated = web::block(move || {
        let mut conn = pool.get()?;
        let n = diesel::update(catalog_items::table.find(item_id))
            .set((
                catalog_items::label.eq(body.label),
                catalog_items::description.eq(body.description),
                catalog_items::unit_price.eq(unit_price),
                catalog_items::released_on.eq(body.released_on),
                catalog_items::category_id.eq(body.category_id),
                catalog_items::image_path.eq(body.image_path),
            ))
            .execute(&mut conn)?;
        Ok::<_, AppError>(n)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    if updated == 0 {
        return Err(AppError::NotFound);
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "item updated" })))
}

/// DELETE /catalog/{id}
#[utoipa::path(
    delete,
    path = "/catalog/{id}",
    params(("id" = Uuid, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item deleted"),
        (status = 404, description = "Item not found"),
        (status = 403, description = "Admin role required"),
    ),
    tag = "catalog"
)]
pub async fn delete_item(
    pool: web::Data<DbPool>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;
    let item_id = path.into_inner();

    let deleted = web::block(move || {
        let mut conn = pool.get()?;
        let n = diesel::delete(catalog_items::table.find(item_id)).execute(&mut conn)?;
        Ok::<_, AppError>(n)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    if deleted == 0 {
        return Err(AppError::NotFound);
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "item deleted" })))
}

/// POST /catalog/search
///
/// Substring search on the label. The pattern is passed as a bound
/// parameter, so SQL metacharacters in the query are matched literally.
#[utoipa::path(
    post,
    path = "/catalog/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching items, possibly empty", body = [ItemResponse]),
        (status = 400, description = "Empty search string"),
    ),
    tag = "catalog"
)]
pub async fn search_items(
    pool: web::Data<DbPool>,
    body: web::Json<SearchRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    if body.query.trim().is_empty() {
        return Err(AppError::Validation("search string is empty".to_string()));
    }

    let items = web::block(move || {
        let mut conn = pool.get()?;
        let pattern = format!("%{}%", body.query);
        let rows = catalog_items::table
            .filter(catalog_items::label.like(pattern))
            .select(CatalogItem::as_select())
            .load(&mut conn)?;
        Ok::<_, AppError>(
            rows.into_iter()
                .map(|item| ItemResponse::from_item(item, None))
                .collect::<Vec<_>>(),
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(items))
}
