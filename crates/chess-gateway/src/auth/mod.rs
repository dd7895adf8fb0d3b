//! Token minting and verification.
//!
//! HS256, 30-day expiry, claims `id` + `username`. `verify` additionally
//! rejects empty `id`/`username` strings, since `jsonwebtoken`'s decode alone
//! only checks the fields are present and well-typed.

mod extractor;

pub use extractor::AuthUser;

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use chess_core::error::{ChessError, Result};

const TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub username: String,
    pub exp: usize,
}

pub fn mint(id: &str, username: &str, secret: &[u8]) -> Result<String> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| ChessError::Internal(format!("system clock error: {e}")))?;
    let claims = Claims {
        id: id.to_string(),
        username: username.to_string(),
        exp: now.as_secs() as usize + TOKEN_TTL_SECS as usize,
    };

    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret))
        .map_err(|e| ChessError::Internal(format!("mint token failed: {e}")))
}

/// Rejects missing, malformed, wrong signing method, expired, or
/// missing-`id`/`username` tokens — all funnel to the same `AuthFailed`, the
/// caller never needs to distinguish why.
pub fn verify(token: &str, secret: &[u8]) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|_| ChessError::AuthFailed)?;

    let claims = data.claims;
    if claims.id.is_empty() || claims.username.is_empty() {
        return Err(ChessError::AuthFailed);
    }

    Ok(claims)
}
