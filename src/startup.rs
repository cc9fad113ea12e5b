use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::http::{header, Method};
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::{MokaRevocationStore, RevocationStore, TokenService};
use crate::configuration::{Settings, UserStoreBackend, UserStoreSettings};
use crate::error::{AppError, ConfigError};
use crate::middleware::{ClaimGuard, JwtMiddleware, LoggerMiddleware};
use crate::routes::{
    admin_user_lookup, current_user, health_check, login, logout, refresh, user_profile,
};
use crate::users::{InMemoryUserStore, PgUserStore, UserStore};

/// Role whose holders may use the `/admin` scope
pub const ADMIN_ROLE: &str = "admin";

/// Everything the handlers share across workers
#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenService,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    /// Assemble state from settings: user store backend plus an empty denylist
    pub async fn build(settings: &Settings) -> Result<Self, ConfigError> {
        let revocations: Arc<dyn RevocationStore> = Arc::new(MokaRevocationStore::new());
        Ok(Self {
            tokens: TokenService::new(&settings.jwt, revocations),
            users: build_user_store(&settings.user_store).await?,
        })
    }
}

async fn build_user_store(settings: &UserStoreSettings) -> Result<Arc<dyn UserStore>, ConfigError> {
    match settings.backend {
        UserStoreBackend::Memory => {
            let store = InMemoryUserStore::from_seed(&settings.users);
            if store.is_empty() {
                tracing::warn!("In-memory user store has no users; every login will fail");
            }
            tracing::info!(users = store.len(), "Using in-memory user store");
            Ok(Arc::new(store))
        }
        UserStoreBackend::Postgres => {
            let database = settings.database.as_ref().ok_or_else(|| {
                ConfigError::MissingRequired("user_store.database".to_string())
            })?;
            tracing::info!(host = %database.host, "Connecting to Postgres user store");

            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database.connection_string())
                .await
                .map_err(|e| {
                    ConfigError::InvalidValue(format!("cannot connect to user database: {}", e))
                })?;
            Ok(Arc::new(PgUserStore::new(pool)))
        }
    }
}

/// Any origin; only the headers the session endpoints read
fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600_usize)
}

/// Malformed or incomplete JSON bodies become 400 `MISSING_REQUIRED_FIELD`
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::MissingRequiredField(err.to_string()).into())
}

pub fn run(listener: TcpListener, state: AppState) -> Result<Server, std::io::Error> {
    let tokens = state.tokens.clone();
    let tokens_data = web::Data::new(state.tokens);
    let users_data: web::Data<dyn UserStore> = web::Data::from(state.users);

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware; the last one wrapped runs first
            .wrap(LoggerMiddleware)
            .wrap(Logger::default())
            .wrap(cors())

            // Shared state
            .app_data(json_config())
            .app_data(tokens_data.clone())
            .app_data(users_data.clone())

            // Public routes
            .route("/health_check", web::get().to(health_check))
            .route("/login", web::post().to(login))

            // Token-protected routes
            .service(
                web::resource("/logout")
                    .wrap(JwtMiddleware::access(tokens.clone()))
                    .route(web::post().to(logout)),
            )
            .service(
                web::resource("/token/refresh")
                    .wrap(JwtMiddleware::refresh(tokens.clone()))
                    .route(web::post().to(refresh)),
            )
            .service(
                web::resource("/me")
                    .wrap(JwtMiddleware::access(tokens.clone()))
                    .route(web::get().to(current_user)),
            )
            .service(
                web::resource("/users/{username}")
                    .wrap(JwtMiddleware::access(tokens.clone()))
                    .route(web::get().to(user_profile)),
            )
            .service(
                web::scope("/admin")
                    .wrap(ClaimGuard::role(ADMIN_ROLE))
                    .wrap(JwtMiddleware::access(tokens.clone()))
                    .route("/users/{username}", web::get().to(admin_user_lookup)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
