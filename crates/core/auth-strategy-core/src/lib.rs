//! Core strategy traits and types for pluggable request authentication.
//!
//! A strategy inspects one incoming request and produces an application
//! identity. The host framework only sees the [`Strategy`] trait; how the
//! credential is obtained and checked is each strategy's own business.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Schema-less claims data carried by or derived for a token.
///
/// No shape is imposed here; payloads flow through the strategy untouched
/// and only the application resolver gives them meaning.
pub type Payload = serde_json::Value;

/// A failure raised by an application callback or a collaborator.
///
/// Callbacks are free to fail with whatever they have at hand: a real
/// error, a bare message, or some other value entirely. Every shape is
/// collapsed into a single [`StrategyError`] before it crosses the public
/// boundary.
#[derive(Debug)]
pub enum Rejection {
    /// A proper error value; its display form survives normalization.
    Error(Box<dyn std::error::Error + Send + Sync>),
    /// A bare message; survives normalization verbatim.
    Message(String),
    /// Any other raised shape; collapsed to a fixed message.
    Opaque(serde_json::Value),
}

impl Rejection {
    pub fn message(message: impl Into<String>) -> Self {
        Rejection::Message(message.into())
    }
}

impl<E> From<E> for Rejection
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Rejection::Error(Box::new(err))
    }
}

/// The one error kind that crosses the strategy boundary.
///
/// Whatever failed inside a call, the caller receives this type carrying a
/// descriptive message; the original failure's type and backtrace are
/// deliberately dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StrategyError {
    message: String,
}

impl StrategyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<Rejection> for StrategyError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::Error(err) => Self::new(err.to_string()),
            Rejection::Message(message) => Self::new(message),
            Rejection::Opaque(_) => Self::new("Unknown error"),
        }
    }
}

/// An application identity together with the token that authenticated it.
///
/// `token` is the exact token the call used: the verified bearer token, or
/// the freshly minted one. It lives outside `user`, so a resolver cannot
/// shadow it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Authenticated<U> {
    pub user: U,
    pub token: String,
}

/// The bundle handed to the application resolver, built fresh per call.
pub struct VerifyContext<'a, R> {
    /// The request that triggered authentication. Read-only.
    pub request: &'a R,
    /// The claims decoded from, or about to be signed into, the token.
    pub payload: Payload,
    /// The serialized token the payload corresponds to.
    pub token: String,
}

/// Application-supplied mapping from a verified or derived payload to an
/// application identity.
#[async_trait]
pub trait ResolveIdentity<R, U>: Send + Sync {
    async fn resolve(&self, ctx: VerifyContext<'_, R>) -> Result<U, Rejection>;
}

/// The lifecycle contract a pluggable authentication strategy satisfies.
///
/// The host framework registers a strategy under its scheme [`name`] and
/// calls [`authenticate`] once per incoming request. Strategies hold no
/// per-call state; concurrent calls are independent.
///
/// [`name`]: Strategy::name
/// [`authenticate`]: Strategy::authenticate
#[async_trait]
pub trait Strategy<R, U>: Send + Sync {
    /// Fixed scheme identifier the host registers this strategy under.
    fn name(&self) -> &'static str;

    /// Authenticate one request, yielding the application identity and the
    /// token that vouches for it.
    async fn authenticate(&self, request: &R) -> Result<Authenticated<U>, StrategyError>;
}

/// Header-lookup capability a strategy needs from an otherwise opaque
/// request type.
pub trait HasAuthorization {
    /// The raw `Authorization` header value, if present and readable as
    /// UTF-8.
    fn authorization(&self) -> Option<&str>;
}

impl HasAuthorization for http::HeaderMap {
    fn authorization(&self) -> Option<&str> {
        self.get(http::header::AUTHORIZATION)?.to_str().ok()
    }
}

impl<B> HasAuthorization for http::Request<B> {
    fn authorization(&self) -> Option<&str> {
        self.headers().authorization()
    }
}
