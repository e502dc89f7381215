//! Identity token handling
//!
//! Accounts live in the access management service. This side only verifies
//! the bearer tokens it issues and turns their claims into a [`User`].

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    constants::roles,
    error::{AppError, AppResult},
    models::User,
};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub role: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Identity carried by the token
    pub fn into_user(self) -> AppResult<User> {
        let id = Uuid::parse_str(&self.sub).map_err(|_| AppError::InvalidToken)?;
        if !roles::ALL.contains(&self.role.as_str()) {
            return Err(AppError::InvalidToken);
        }

        Ok(User {
            id,
            role: self.role,
            branch: self.branch,
            section: self.section,
        })
    }
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Verify JWT token and extract claims
    pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Sign a token for `user`, valid for `ttl`
    pub fn issue_token(user: &User, secret: &str, ttl: Duration) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role.clone(),
            branch: user.branch.clone(),
            section: user.section.clone(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))
    }
}
