use admin_console::config::get_configuration;
use admin_console::services::ApiClient;
use admin_console::startup::build_router;
use admin_console::AppState;
use console_core::observability::init_tracing;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "admin-console",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    )?;

    admin_console::services::metrics::init_metrics()?;

    let api_client = Arc::new(ApiClient::new(configuration.api.clone()));
    info!(api_url = %api_client.base_url(), "Using REST backend");

    let app = build_router(AppState::new(
        api_client,
        time::Duration::hours(configuration.server.session_inactivity_hours),
    ));

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting admin-console on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
