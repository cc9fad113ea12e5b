use serde::Deserialize;

use crate::error::ConfigError;

/// Minimum HMAC secret length accepted at startup
pub const MIN_SECRET_LENGTH: usize = 32;

/// Upper bound on either token lifetime: ten years, in seconds
pub const MAX_TOKEN_EXPIRY: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
    pub user_store: UserStoreSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

/// JWT authentication settings
#[derive(Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_expiry: i64,   // seconds (e.g., 900 for 15 minutes)
    pub refresh_token_expiry: i64,  // seconds (e.g., 2592000 for 30 days)
    pub issuer: String,
    #[serde(default)]
    pub leeway: u64,                // seconds of clock skew tolerated on `exp`
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserStoreBackend {
    Memory,
    Postgres,
}

#[derive(Deserialize, Clone)]
pub struct UserStoreSettings {
    pub backend: UserStoreBackend,
    pub database: Option<DatabaseSettings>,
    /// Seed users for the in-memory backend
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

#[derive(Deserialize, Clone)]
pub struct SeedUser {
    /// Stable id so tokens stay resolvable across restarts; generated when absent
    #[serde(default)]
    pub id: Option<uuid::Uuid>,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }
}

impl Settings {
    /// Reject configurations that would make every request fail.
    /// Called once at startup; an error here aborts the process.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::InvalidValue(format!(
                "jwt.secret must be at least {} bytes",
                MIN_SECRET_LENGTH
            )));
        }
        if self.jwt.access_token_expiry <= 0 || self.jwt.refresh_token_expiry <= 0 {
            return Err(ConfigError::InvalidValue(
                "jwt token expiries must be positive".to_string(),
            ));
        }
        if self.jwt.access_token_expiry > MAX_TOKEN_EXPIRY
            || self.jwt.refresh_token_expiry > MAX_TOKEN_EXPIRY
        {
            return Err(ConfigError::InvalidValue(format!(
                "jwt token expiries must not exceed {} seconds",
                MAX_TOKEN_EXPIRY
            )));
        }
        if self.user_store.backend == UserStoreBackend::Postgres
            && self.user_store.database.is_none()
        {
            return Err(ConfigError::MissingRequired(
                "user_store.database (required by the postgres backend)".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load settings from `configuration.{yaml,toml,json}` and `APP_*` environment
/// variables (e.g. `APP_JWT__SECRET`), then validate them.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    let settings = settings.try_deserialize::<Settings>()?;
    settings.validate()?;
    Ok(settings)
}
