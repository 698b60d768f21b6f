use std::sync::Arc;

use agenda_api::{ApiState, config::ApiConfig, middleware::auth::JwtVerifier};
use agenda_db::{PgStore, create_pool, schema::initialize_database};
use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create database connection pool
    let db_pool = create_pool(&config.database_url, config.database_max_connections)
        .await
        .wrap_err("Failed to connect to the database")?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    let auth = JwtVerifier::new(&config.jwt_secret, config.jwt_audience.as_deref());
    let state = Arc::new(ApiState::new(Arc::new(PgStore::new(db_pool)), auth));

    info!("Starting agenda API v{}", env!("CARGO_PKG_VERSION"));
    agenda_api::start_server(config, state).await?;

    Ok(())
}
