/// Middleware module
///
/// Token authentication, claim guards and request logging.

mod claim_guard;
mod jwt_middleware;
mod logger;

pub use claim_guard::ClaimGuard;
pub use jwt_middleware::{extract_bearer_token, JwtMiddleware};
pub use logger::LoggerMiddleware;
