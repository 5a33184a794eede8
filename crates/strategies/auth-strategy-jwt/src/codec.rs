//! Token codec seam and its `jsonwebtoken`-backed default.

use async_trait::async_trait;
use auth_strategy_core::{Payload, Rejection};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

/// Serializes payloads into signed tokens and back.
///
/// The strategy treats the codec as a trusted black box: whatever it
/// reports on failure travels through the normal rejection path. The
/// interface is async so a remote signer can sit behind it.
#[async_trait]
pub trait TokenCodec: Send + Sync {
    /// Sign `payload` with `secret`, producing the serialized token.
    async fn sign(&self, payload: &Payload, secret: &str) -> Result<String, Rejection>;

    /// Verify `token` against `secret`, accepting only `algorithms`, and
    /// decode its payload.
    ///
    /// A codec may hand back any JSON shape; the strategy rejects a `null`
    /// payload as an invalid token. The default codec only ever yields
    /// objects, since `jsonwebtoken` refuses non-object claims outright.
    async fn verify(
        &self,
        token: &str,
        secret: &str,
        algorithms: &[Algorithm],
    ) -> Result<Payload, Rejection>;
}

#[derive(Debug, Error)]
enum CodecError {
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("token has expired")]
    Expired,
}

/// The default codec: HMAC-signed JWTs via the `jsonwebtoken` crate.
///
/// Payloads are schema-less, so no claim is required up front; expiry is
/// still enforced whenever a token carries an `exp` claim. Freshly signed
/// payloads get an `iat` claim stamped on when they lack one.
#[derive(Debug, Clone)]
pub struct JsonWebTokenCodec {
    signing_algorithm: Algorithm,
}

impl JsonWebTokenCodec {
    pub fn new(signing_algorithm: Algorithm) -> Self {
        Self { signing_algorithm }
    }
}

impl Default for JsonWebTokenCodec {
    fn default() -> Self {
        Self::new(Algorithm::HS256)
    }
}

#[async_trait]
impl TokenCodec for JsonWebTokenCodec {
    async fn sign(&self, payload: &Payload, secret: &str) -> Result<String, Rejection> {
        let mut claims = payload.clone();
        if let Some(object) = claims.as_object_mut() {
            object
                .entry("iat")
                .or_insert_with(|| Utc::now().timestamp().into());
        }

        let token = encode(
            &Header::new(self.signing_algorithm),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(CodecError::Jwt)?;

        Ok(token)
    }

    async fn verify(
        &self,
        token: &str,
        secret: &str,
        algorithms: &[Algorithm],
    ) -> Result<Payload, Rejection> {
        let mut validation = Validation::new(self.signing_algorithm);
        validation.algorithms = algorithms.to_vec();
        // Schema-less payloads: nothing is required up front, and expiry
        // is checked by hand below when the token carries an exp claim.
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;

        let decoded = decode::<Payload>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(CodecError::Jwt)?;

        let claims = decoded.claims;
        if let Some(exp) = claims.get("exp").and_then(|v| v.as_i64()) {
            if exp < Utc::now().timestamp() {
                return Err(CodecError::Expired.into());
            }
        }

        Ok(claims)
    }
}
