use search_service::{telemetry, Dependencies, IndexingError, ServiceConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    dotenv::dotenv().ok();

    let config = ServiceConfig::from_env()?;
    telemetry::init_tracing(config.log_format);

    let dependencies = match Dependencies::new(&config).await {
        Ok(dependencies) => dependencies,
        Err(e) => {
            error!(error = %e, "Failed to initialize search service");
            return Err(e);
        }
    };

    info!("Search service started");

    // The facade is a library entry point; this binary wires no request
    // transport and only runs the consumers until Ctrl-C.
    let _service = dependencies.service;
    let outcomes = dependencies.orchestrator.run().await;

    let failed = outcomes.iter().filter(|(_, result)| result.is_err()).count();
    info!(consumers = outcomes.len(), failed, "Search service stopped");

    Ok(())
}
