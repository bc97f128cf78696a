use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_mock::{AppState, MockConfig, MockStore, router};

/// Main entry point for the HMS development backend
///
/// Serves the in-memory mock of the HMS REST API, seeded from the stub fixtures, so the CLI and
/// client library can be exercised without the real backend.
///
/// # Environment Variables
/// - `HMS_MOCK_ADDR`: bind address (default: "0.0.0.0:5000")
/// - `HMS_MOCK_ENVELOPE`: response envelope, one of `bare`, `data`, `items`, `named` (default: `data`)
/// - `HMS_STUB_FIXTURES`: YAML seed file (default: the embedded fixtures)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - configuration or seed fixtures are invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hms=info".parse()?)
                .add_directive("api_mock=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = MockConfig::from_env()?;
    let stubs = cfg.seed()?;
    let app = router(AppState::new(MockStore::seeded(&stubs), cfg.envelope));

    tracing::info!(
        "-- Starting HMS mock API on {} ({:?} envelope)",
        cfg.addr,
        cfg.envelope
    );
    tracing::info!("-- Swagger UI at http://{}/swagger-ui/", cfg.addr);

    let listener = tokio::net::TcpListener::bind(cfg.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
