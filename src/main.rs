use anyhow::Result;

use siteadmin_backend::{config, create_app, logging, AdminStore, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let settings = config::Settings::from_env()?;

    logging::init_logging(&settings.env)?;

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        "Starting site admin backend"
    );

    let store = if settings.seed_demo_data {
        AdminStore::seeded()
    } else {
        AdminStore::new()
    };
    tracing::info!(seeded = settings.seed_demo_data, "Record store ready");

    let state = AppState::new(settings.clone(), store);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
