use std::future::{ready, Ready};

use actix_web::http::header;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Bearer tokens are valid for 24 hours.
pub const TOKEN_TTL_SECS: i64 = 86_400;

const BCRYPT_COST: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Admin,
    Support,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Admin => "admin",
            Role::Support => "support",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "client" => Some(Role::Client),
            "admin" => Some(Role::Admin),
            "support" => Some(Role::Support),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signing configuration, injected as app data.
#[derive(Clone)]
pub struct AuthSettings {
    secret: String,
}

impl AuthSettings {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            role,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized("invalid or expired token".to_string()))
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| AppError::Internal(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    bcrypt::verify(password, hash).map_err(|e| AppError::Internal(e.to_string()))
}

/// Extractor for routes behind the authentication boundary.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Admins act for anyone; everyone else only for themselves.
    pub fn require_customer(&self, customer_id: Uuid) -> Result<(), AppError> {
        if self.role == Role::Admin || self.id == customer_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "not authorized for this customer".to_string(),
            ))
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("admin role required".to_string()))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let settings = req
        .app_data::<web::Data<AuthSettings>>()
        .ok_or_else(|| AppError::Internal("auth settings not configured".to_string()))?;
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;
    let claims = settings.verify(token)?;
    Ok(AuthenticatedUser {
        id: claims.sub,
        role: claims.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_and_verify_roundtrip() {
        let settings = AuthSettings::new("test-secret");
        let user_id = Uuid::new_v4();

        let token = settings.issue(user_id, Role::Client).expect("issue failed");
        let claims = settings.verify(&token).expect("verify failed");

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Client);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = AuthSettings::new("secret-a");
        let verifier = AuthSettings::new("secret-b");

        let token = issuer.issue(Uuid::new_v4(), Role::Admin).expect("issue");
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let settings = AuthSettings::new("test-secret");
        let past = Utc::now().timestamp() - 2 * TOKEN_TTL_SECS;
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: Role::Client,
            iat: past,
            exp: past + TOKEN_TTL_SECS,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("encode");

        assert!(settings.verify(&token).is_err());
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("hunter2").expect("hash");
        assert!(verify_password("hunter2", &hash).expect("verify"));
        assert!(!verify_password("hunter3", &hash).expect("verify"));
    }

    #[test]
    fn role_parse_roundtrip() {
        for role in [Role::Client, Role::Admin, Role::Support] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn admin_acts_for_any_customer() {
        let admin = AuthenticatedUser {
            id: Uuid::new_v4(),
            role: Role::Admin,
        };
        assert!(admin.require_customer(Uuid::new_v4()).is_ok());
        assert!(admin.require_admin().is_ok());
    }

    #[test]
    fn client_only_acts_for_itself() {
        let id = Uuid::new_v4();
        let client = AuthenticatedUser {
            id,
            role: Role::Client,
        };
        assert!(client.require_customer(id).is_ok());
        assert!(client.require_customer(Uuid::new_v4()).is_err());
        assert!(client.require_admin().is_err());
    }
}
