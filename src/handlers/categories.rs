use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::category::{Category, NewCategory};
use crate::schema::categories;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub label: String,
}

/// GET /categories
#[utoipa::path(
    get,
    path = "/categories",
    responses((status = 200, description = "All categories", body = [Category])),
    tag = "categories"
)]
pub async fn list_categories(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let items = web::block(move || {
        let mut conn = pool.get()?;
        let rows = categories::table
            .select(Category::as_select())
            .order(categories::label.asc())
            .load(&mut conn)?;
        Ok::<_, AppError>(rows)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(items))
}

/// POST /categories
#[utoipa::path(
    post,
    path = "/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created"),
        (status = 403, description = "Admin role required"),
    ),
    tag = "categories"
)]
pub async fn create_category(
    pool: web::Data<DbPool>,
    auth: AuthenticatedUser,
    body: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;
    let body = body.into_inner();
    if body.label.trim().is_empty() {
        return Err(AppError::Validation("label is required".to_string()));
    }

    let id = Uuid::new_v4();
    web::block(move || {
        let mut conn = pool.get()?;
        diesel::insert_into(categories::table)
            .values(&NewCategory {
                id,
                label: body.label,
            })
            .execute(&mut conn)?;
        Ok::<_, AppError>(())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(json!({ "message": "category created", "id": id })))
}
