//! The strategy proper: branch on token presence, then delegate.

use std::sync::Arc;

use async_trait::async_trait;
use auth_strategy_core::{
    Authenticated, HasAuthorization, Payload, Rejection, ResolveIdentity, Strategy, StrategyError,
    VerifyContext,
};
use jsonwebtoken::Algorithm;
use tracing::debug;

use crate::codec::{JsonWebTokenCodec, TokenCodec};
use crate::config::JwtStrategyConfig;

/// Derives the payload to sign when a request carries no bearer token.
#[async_trait]
pub trait PayloadSource<R>: Send + Sync {
    /// `Ok(None)` means the request yields no payload; the strategy fails
    /// the call rather than signing an empty token.
    async fn derive(&self, request: &R) -> Result<Option<Payload>, Rejection>;
}

#[async_trait]
impl<R, F> PayloadSource<R> for F
where
    R: Sync,
    F: Fn(&R) -> Result<Option<Payload>, Rejection> + Send + Sync,
{
    async fn derive(&self, request: &R) -> Result<Option<Payload>, Rejection> {
        self(request)
    }
}

/// JWT bearer authentication strategy.
///
/// Generic over the request type `R` and the application identity `U` the
/// resolver produces. Holds no per-call state; one instance serves any
/// number of concurrent calls.
pub struct JwtStrategy<R, U> {
    config: JwtStrategyConfig<R>,
    resolver: Arc<dyn ResolveIdentity<R, U>>,
    codec: Arc<dyn TokenCodec>,
}

impl<R, U> JwtStrategy<R, U> {
    /// Build a strategy from its configuration and resolver callback,
    /// signing and verifying with the default `jsonwebtoken` codec.
    pub fn new(config: JwtStrategyConfig<R>, resolver: Arc<dyn ResolveIdentity<R, U>>) -> Self {
        let signing_algorithm = config
            .algorithms
            .first()
            .copied()
            .unwrap_or(Algorithm::HS256);

        Self {
            config,
            resolver,
            codec: Arc::new(JsonWebTokenCodec::new(signing_algorithm)),
        }
    }

    /// Swap in a different codec (a remote signer, a stub in tests).
    pub fn with_codec(mut self, codec: Arc<dyn TokenCodec>) -> Self {
        self.codec = codec;
        self
    }
}

/// The token part of an `Authorization` value, `"<scheme> <token>"`.
///
/// A value without a space has no token part; callers treat that the same
/// as a missing header.
pub(crate) fn bearer_token(header: &str) -> Option<&str> {
    header.split(' ').nth(1)
}

impl<R, U> JwtStrategy<R, U>
where
    R: HasAuthorization + Send + Sync,
    U: Send,
{
    /// The call body, over [`Rejection`]. Exactly one of sign-fresh or
    /// verify-presented runs per call.
    async fn run(&self, request: &R) -> Result<Authenticated<U>, Rejection> {
        let candidate = request.authorization().and_then(bearer_token);

        let (payload, token) = match candidate {
            None => {
                debug!("no bearer token presented, deriving a payload");
                let payload = self
                    .config
                    .payload_source
                    .derive(request)
                    .await?
                    .ok_or_else(|| Rejection::message("getPayload returns undefined!"))?;
                let token = self.codec.sign(&payload, &self.config.secret).await?;
                (payload, token)
            }
            Some(candidate) => {
                debug!("verifying presented bearer token");
                let payload = self
                    .codec
                    .verify(candidate, &self.config.secret, &self.config.algorithms)
                    .await?;
                if payload.is_null() {
                    return Err(Rejection::message("Invalid token"));
                }
                (payload, candidate.to_string())
            }
        };

        let user = self
            .resolver
            .resolve(VerifyContext {
                request,
                payload,
                token: token.clone(),
            })
            .await?;

        Ok(Authenticated { user, token })
    }
}

#[async_trait]
impl<R, U> Strategy<R, U> for JwtStrategy<R, U>
where
    R: HasAuthorization + Send + Sync,
    U: Send,
{
    fn name(&self) -> &'static str {
        "jwt"
    }

    async fn authenticate(&self, request: &R) -> Result<Authenticated<U>, StrategyError> {
        // Single normalization point: every failure inside the call
        // crosses the boundary as a StrategyError.
        self.run(request).await.map_err(StrategyError::from)
    }
}
