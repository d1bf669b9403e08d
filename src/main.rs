//! Binary entry point: configuration, database bootstrap, HTTP serve loop.

use dotenvy::dotenv;
use quickbite::{api, config, errors::Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; non-fatal, env vars can be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::settings::load_app_configuration()
        .inspect_err(|e| error!("failed to load configuration: {e}"))?;
    info!("configuration loaded, binding to {}", app_config.bind_address);

    // 4. Initialize the database and make sure the schema exists
    let db = config::database::create_connection(&app_config.database_url)
        .await
        .inspect(|_| info!("database connection established"))
        .inspect_err(|e| error!("failed to connect to database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect_err(|e| error!("failed to create tables: {e}"))?;

    // 5. Serve
    api::start_server(app_config.bind_address, db).await
}
