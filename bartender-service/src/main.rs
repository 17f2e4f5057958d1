use bartender_service::config::BartenderConfig;
use bartender_service::Application;
use service_core::error::AppError;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = BartenderConfig::load()?;

    init_tracing(
        "bartender-service",
        &config.common.log_level,
        config.otlp_endpoint.as_deref(),
    );

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.common.environment,
        "Starting bartender service"
    );

    // A dead key-value store at startup is fatal: the service must not
    // accept traffic it cannot serve.
    let app = Application::build(config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to start bartender service");
        e
    })?;

    app.run_until_stopped().await?;
    Ok(())
}
