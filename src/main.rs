use std::net::TcpListener;
use session_gate::configuration::get_configuration;
use session_gate::startup::{run, AppState};
use session_gate::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry("info").map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::Other, format!("telemetry: {}", e))
    })?;

    tracing::info!("Starting application");

    // A bad secret or missing store settings must stop the process here,
    // never surface per request.
    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    let state = AppState::build(&configuration).await.map_err(|e| {
        tracing::error!("Failed to initialize application state: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    run(listener, state)?.await
}
