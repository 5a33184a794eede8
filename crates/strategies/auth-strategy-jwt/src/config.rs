//! JWT strategy configuration.

use std::sync::Arc;

use jsonwebtoken::Algorithm;

use crate::strategy::PayloadSource;

/// Configuration for [`JwtStrategy`](crate::JwtStrategy).
///
/// Built once at construction, never mutated afterwards, and shared freely
/// across concurrent calls.
pub struct JwtStrategyConfig<R> {
    /// Key material used for both signing and verification.
    pub secret: String,
    /// Algorithms accepted when verifying a presented token. The first
    /// entry also signs fresh tokens (HS256 when the list is empty).
    pub algorithms: Vec<Algorithm>,
    /// Derives the payload to sign when the request carries no token.
    pub payload_source: Arc<dyn PayloadSource<R>>,
}

impl<R> Clone for JwtStrategyConfig<R> {
    fn clone(&self) -> Self {
        Self {
            secret: self.secret.clone(),
            algorithms: self.algorithms.clone(),
            payload_source: Arc::clone(&self.payload_source),
        }
    }
}
