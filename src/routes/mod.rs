mod health_check;
mod session;
mod users;

pub use health_check::health_check;
pub use session::{login, logout, refresh, LoginRequest, LoginResponse, RefreshResponse};
pub use users::{admin_user_lookup, current_user, user_profile};
