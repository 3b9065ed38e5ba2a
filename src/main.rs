use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use lepcare_core::{SampleData, config::config_from_env_values};

/// Main entry point for the LepCare application
///
/// Resolves configuration from the environment, loads the sample roster and ledger, and serves
/// the REST API until interrupted.
///
/// # Environment Variables
/// - `LEPCARE_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `LEPCARE_FOLLOW_UP_DAYS`: Days from registration to the first follow-up (default: 14)
/// - `LEPCARE_ANALYSIS_DELAY_MS`: Simulated image analysis time (default: 3000)
/// - `LEPCARE_MAX_IMAGE_BYTES`: Largest accepted upload (default: 10485760)
/// - `LEPCARE_FIXTURE`: YAML file replacing the built-in sample data
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - a configuration value or the fixture is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lepcare_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Arc::new(config_from_env_values(
        std::env::var("LEPCARE_FOLLOW_UP_DAYS").ok(),
        std::env::var("LEPCARE_ANALYSIS_DELAY_MS").ok(),
        std::env::var("LEPCARE_MAX_IMAGE_BYTES").ok(),
    )?);

    let data = match std::env::var("LEPCARE_FIXTURE").ok() {
        Some(fixture) => {
            let path = Path::new(&fixture);
            if !path.exists() {
                anyhow::bail!("Fixture file does not exist: {}", path.display());
            }
            SampleData::parse(&std::fs::read_to_string(path)?, &cfg)?
        }
        None => SampleData::builtin(&cfg)?,
    };
    tracing::info!(
        patients = data.roster.len(),
        treatments = data.ledger.len(),
        "-- Sample data loaded"
    );

    let rest_addr = std::env::var("LEPCARE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    tracing::info!("-- Starting LepCare REST API on {}", rest_addr);

    let app = router(AppState::new(cfg, data));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("-- Shutting down");
        })
        .await?;

    Ok(())
}
