use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::payment::{NewPayment, Payment};
use crate::schema::payments;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub method: String,
}

/// GET /payments
#[utoipa::path(
    get,
    path = "/payments",
    responses(
        (status = 200, description = "All payments", body = [Payment]),
        (status = 403, description = "Admin role required"),
    ),
    tag = "payments"
)]
pub async fn list_payments(
    pool: web::Data<DbPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;

    let items = web::block(move || {
        let mut conn = pool.get()?;
        let rows = payments::table
            .select(Payment::as_select())
            .order(payments::created_at.desc())
            .load(&mut conn)?;
        Ok::<_, AppError>(rows)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(items))
}

/// GET /payments/{id}
#[utoipa::path(
    get,
    path = "/payments/{id}",
    params(("id" = Uuid, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Payment found", body = Payment),
        (status = 404, description = "Payment not found"),
    ),
    tag = "payments"
)]
pub async fn get_payment(
    pool: web::Data<DbPool>,
    _auth: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let payment_id = path.into_inner();

    let payment = web::block(move || {
        let mut conn = pool.get()?;
        let row = payments::table
            .find(payment_id)
            .select(Payment::as_select())
            .first(&mut conn)
            .optional()?;
        Ok::<_, AppError>(row)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    match payment {
        Some(p) => Ok(HttpResponse::Ok().json(p)),
        None => Err(AppError::NotFound),
    }
}

/// POST /payments
#[utoipa::path(
    post,
    path = "/payments",
    request_body = CreatePaymentRequest,
    responses((status = 201, description = "Payment created")),
    tag = "payments"
)]
pub async fn create_payment(
    pool: web::Data<DbPool>,
    _auth: AuthenticatedUser,
    body: web::Json<CreatePaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    if body.method.trim().is_empty() {
        return Err(AppError::Validation("method is required".to_string()));
    }

    let id = Uuid::new_v4();
    web::block(move || {
        let mut conn = pool.get()?;
        diesel::insert_into(payments::table)
            .values(&NewPayment {
                id,
                method: body.method,
            })
            .execute(&mut conn)?;
        Ok::<_, AppError>(())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(json!({ "message": "payment created", "id": id })))
}
