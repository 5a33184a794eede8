//! JWT bearer authentication strategy.
//!
//! Works over any request type that can expose an `Authorization` header.
//! When a bearer token is presented it is verified against the configured
//! secret and algorithm allowlist; when none is, a payload is derived from
//! the request and a fresh token is signed for it. Either way the decoded
//! payload and the token are handed to an application-supplied resolver,
//! whose result is returned together with that token.

mod codec;
mod config;
mod strategy;


pub use codec::{JsonWebTokenCodec, TokenCodec};
pub use config::JwtStrategyConfig;
pub use strategy::{JwtStrategy, PayloadSource};

// Re-export common types for convenience
pub use auth_strategy_core::{
    Authenticated, HasAuthorization, Payload, Rejection, ResolveIdentity, Strategy, StrategyError,
    VerifyContext,
};
pub use jsonwebtoken::Algorithm;
