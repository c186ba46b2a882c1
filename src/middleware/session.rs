use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, middleware::shop::is_valid_shop, AppState};

/// Claims embedded in the shop session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String, // shop domain
    pub exp: usize,
    pub iat: usize,
}

/// The shop the caller is authenticated as, taken from a verified session token.
/// Admin handlers scope every store operation with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopSession {
    pub shop: String,
}

impl FromRequestParts<AppState> for ShopSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("Invalid Authorization header format"))?;

        decode_session_token(token, &state.config.jwt_secret)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired session"))
    }
}

pub fn issue_session_token(shop: &str, secret: &str, ttl_seconds: u64) -> anyhow::Result<String> {
    if !is_valid_shop(shop) {
        anyhow::bail!("Invalid shop identifier: {shop}");
    }
    let now = Utc::now().timestamp() as usize;
    let claims = SessionClaims {
        sub: shop.to_owned(),
        iat: now,
        exp: now.saturating_add(usize::try_from(ttl_seconds).unwrap_or(usize::MAX)),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn decode_session_token(token: &str, secret: &str) -> anyhow::Result<ShopSession> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<SessionClaims>(token, &key, &validation)?;
    let shop = data.claims.sub;
    if !is_valid_shop(&shop) {
        anyhow::bail!("Session carries an invalid shop");
    }
    Ok(ShopSession { shop })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trips_the_shop() {
        let token = issue_session_token("demo-shop.myshopify.com", SECRET, 60).unwrap();
        let session = decode_session_token(&token, SECRET).unwrap();
        assert_eq!(session.shop, "demo-shop.myshopify.com");
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = issue_session_token("demo-shop.myshopify.com", "other", 60).unwrap();
        assert!(decode_session_token(&token, SECRET).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now().timestamp() as usize;
        let claims = SessionClaims {
            sub: "demo-shop.myshopify.com".into(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(decode_session_token(&token, SECRET).is_err());
    }

    #[test]
    fn oversized_ttl_saturates_instead_of_overflowing() {
        let token = issue_session_token("demo-shop.myshopify.com", SECRET, u64::MAX).unwrap();
        let session = decode_session_token(&token, SECRET).unwrap();
        assert_eq!(session.shop, "demo-shop.myshopify.com");
    }

    #[test]
    fn cannot_issue_for_invalid_shop() {
        assert!(issue_session_token("not a shop", SECRET, 60).is_err());
    }
}
