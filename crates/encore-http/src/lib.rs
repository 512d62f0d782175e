//! encore-http - HTTP API gateway and domain query modules.
//!
//! [`ApiGateway`] implements every domain query trait from `encore-core`
//! over a single `reqwest` client. Each request runs through the
//! [`AuthInterceptor`], which attaches the session's bearer token, refuses
//! to send requests with an expired token, and ends the session when the
//! server rejects it.

mod auth;
pub mod config;
pub mod endpoints;
mod gateway;
pub mod interceptor;
mod performances;
mod reviews;
mod users;

pub use config::GatewayConfig;
pub use gateway::ApiGateway;
pub use interceptor::AuthInterceptor;
