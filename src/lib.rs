//! Password login, signed session tokens, a revoked-token denylist and claim
//! guards, served over actix-web.

pub mod auth;
pub mod configuration;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod users;
