use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Recruiter,
    Manager,
    User,
}

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: usize,
}

/// The signed-in user, inserted into request extensions by `require_session`.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl Session {
    /// Fails with 403 unless the session holds one of `roles`.
    pub fn require_any(&self, roles: &[Role]) -> Result<(), AppError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// HS256 keys derived from `SESSION_SECRET`.
#[derive(Clone)]
pub struct SessionKeys {
    decoding: DecodingKey,
    #[cfg(test)]
    encoding: jsonwebtoken::EncodingKey,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            #[cfg(test)]
            encoding: jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Session, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims.into())
            .map_err(|e| {
                debug!("Rejected session token: {e}");
                AppError::Unauthorized
            })
    }

    /// Reads `Authorization: Bearer <token>`; `None` when absent or invalid.
    pub fn session_from_headers(&self, headers: &HeaderMap) -> Option<Session> {
        let token = headers
            .get(AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?
            .trim();
        self.verify(token).ok()
    }

    #[cfg(test)]
    pub fn issue(&self, user_id: Uuid, email: &str, role: Role) -> String {
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
        };
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), &claims, &self.encoding)
            .expect("encoding test token")
    }
}
