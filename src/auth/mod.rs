/// Authentication module
///
/// Credential verification, JWT issuing and validation, the revoked-token
/// denylist and claim guards.

mod claims;
mod credentials;
mod guard;
mod jwt;
mod password;
mod revocation;
mod tokens;

pub use claims::{Claims, Identity, TokenType};
pub use credentials::authenticate;
pub use guard::{author_required, guarded, role_required, Requirement};
pub use jwt::{JwtManager, TokenPair};
pub use password::{hash_password, hash_password_with_cost, verify_password};
pub use revocation::{MokaRevocationStore, RevocationStore};
pub use tokens::TokenService;
