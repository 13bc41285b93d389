use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::address::{Address, NewAddress};
use crate::schema::addresses;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAddressRequest {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAddressRequest {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// GET /addresses/user/{user_id}
#[utoipa::path(
    get,
    path = "/addresses/user/{user_id}",
    params(("user_id" = Uuid, Path, description = "Owner of the addresses")),
    responses(
        (status = 200, description = "Addresses of the user", body = [Address]),
        (status = 403, description = "Not the owner"),
    ),
    tag = "addresses"
)]
pub async fn list_addresses_by_user(
    pool: web::Data<DbPool>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    auth.require_customer(user_id)?;

    let items = web::block(move || {
        let mut conn = pool.get()?;
        let rows = addresses::table
            .filter(addresses::user_id.eq(user_id))
            .select(Address::as_select())
            .load(&mut conn)?;
        Ok::<_, AppError>(rows)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(items))
}

/// POST /addresses
#[utoipa::path(
    post,
    path = "/addresses",
    request_body = CreateAddressRequest,
    responses(
        (status = 201, description = "Address created"),
        (status = 403, description = "Not the owner"),
    ),
    tag = "addresses"
)]
pub async fn create_address(
    pool: web::Data<DbPool>,
    auth: AuthenticatedUser,
    body: web::Json<CreateAddressRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    auth.require_customer(body.user_id)?;

    let id = Uuid::new_v4();
    web::block(move || {
        let mut conn = pool.get()?;
        diesel::insert_into(addresses::table)
            .values(&NewAddress {
                id,
                street: body.street,
                city: body.city,
                postal_code: body.postal_code,
                country: body.country,
                user_id: body.user_id,
            })
            .execute(&mut conn)?;
        Ok::<_, AppError>(())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(json!({ "message": "address created", "id": id })))
}

/// PATCH /addresses/{id}
#[utoipa::path(
    patch,
    path = "/addresses/{id}",
    params(("id" = Uuid, Path, description = "Address id")),
    request_body = UpdateAddressRequest,
    responses(
        (status = 200, description = "Address updated"),
        (status = 404, description = "Address not found"),
        (status = 403, description = "Not the owner"),
    ),
    tag = "addresses"
)]
pub async fn update_address(
    pool: web::Data<DbPool>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateAddressRequest>,
) -> Result<HttpResponse, AppError> {
    let address_id = path.into_inner();
    let body = body.into_inner();

    web::block(move || {
        let mut conn = pool.get()?;
        let address = addresses::table
            .find(address_id)
            .select(Address::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or(AppError::NotFound)?;
        auth.require_customer(address.user_id)?;

        diesel::update(addresses::table.find(address_id))
            .set((
                addresses::street.eq(body.street),
                addresses::city.eq(body.city),
                addresses::postal_code.eq(body.postal_code),
                addresses::country.eq(body.country),
            ))
            .execute(&mut conn)?;
        Ok::<_, AppError>(())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(json!({ "message": "address updated" })))
}

/// DELETE /addresses/{id}
#[utoipa::path(
    delete,
    path = "/addresses/{id}",
    params(("id" = Uuid, Path, description = "Address id")),
    responses(
        (status = 200, description = "Address deleted"),
        (status = 404, description = "Address not found"),
        (status = 403, description = "Not the owner"),
    ),
    tag = "addresses"
)]
pub async fn delete_address(
    pool: web::Data<DbPool>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let address_id = path.into_inner();

    web::block(move || {
        let mut conn = pool.get()?;
        let address = addresses::table
            .find(address_id)
            .select(Address::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or(AppError::NotFound)?;
        auth.require_customer(address.user_id)?;

        diesel::delete(addresses::table.find(address_id)).execute(&mut conn)?;
        Ok::<_, AppError>(())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(json!({ "message": "address deleted" })))
}
