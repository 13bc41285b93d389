use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, AuthSettings, AuthenticatedUser, Role};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user::{NewUser, User};
use crate::schema::users;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    pub id: Uuid,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<User> for UserInfo {
    fn from(u: User) -> Self {
        UserInfo {
            id: u.id,
            role: u.role,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
        }
    }
}

/// POST /users/sign-up
#[utoipa::path(
    post,
    path = "/users/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Invalid input or duplicate email"),
    ),
    tag = "users"
)]
pub async fn sign_up(
    pool: web::Data<DbPool>,
    body: web::Json<SignUpRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::Validation(
            "email and password are required".to_string(),
        ));
    }

    let id = Uuid::new_v4();
    web::block(move || {
        let password_hash = hash_password(&body.password)?;
        let mut conn = pool.get()?;
        diesel::insert_into(users::table)
            .values(&NewUser {
                id,
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                password_hash,
                role: body.role.as_str().to_string(),
            })
            .execute(&mut conn)?;
        Ok::<_, AppError>(())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(json!({ "message": "user created", "id": id })))
}

/// POST /users/sign-in
///
/// Verifies the password and returns a bearer token valid for 24 hours.
#[utoipa::path(
    post,
    path = "/users/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in, token returned"),
        (status = 401, description = "Invalid password"),
        (status = 404, description = "Unknown email"),
    ),
    tag = "users"
)]
pub async fn sign_in(
    pool: web::Data<DbPool>,
    auth: web::Data<AuthSettings>,
    body: web::Json<SignInRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let response = web::block(move || {
        let mut conn = pool.get()?;
        let user = users::table
            .filter(users::email.eq(&body.email))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or(AppError::NotFound)?;

        if !verify_password(&body.password, &user.password_hash)? {
            return Err(AppError::Unauthorized("invalid password".to_string()));
        }

        let role = Role::parse(&user.role)
            .ok_or_else(|| AppError::Internal(format!("unknown role '{}'", user.role)))?;
        let token = auth.issue(user.id, role)?;

        Ok::<_, AppError>(json!({
            "auth": true,
            "token": token,
            "info": UserInfo::from(user),
        }))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(response))
}

/// GET /users
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users, without credentials", body = [UserInfo]),
        (status = 403, description = "Admin role required"),
    ),
    tag = "users"
)]
pub async fn list_users(
    pool: web::Data<DbPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;

    let items = web::block(move || {
        let mut conn = pool.get()?;
        let rows = users::table
            .select(User::as_select())
            .order(users::created_at.desc())
            .load(&mut conn)?;
        Ok::<_, AppError>(rows.into_iter().map(UserInfo::from).collect::<Vec<_>>())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(items))
}
