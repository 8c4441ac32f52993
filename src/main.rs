#![allow(clippy::result_large_err)]

use dotenvy::dotenv;
use planbook::{
    config::{self, database, seed},
    core::time::Clock,
    errors::Result,
    web::{self, AppState},
};
use std::{env, sync::Arc};
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

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = config::load_app_configuration()?;
    let timezone = app_config.planner.timezone()?;
    info!("Using timezone {timezone}");

    // 4. Connect and create tables; the default SQLite file lives under data/
    if env::var("DATABASE_URL").is_err() {
        std::fs::create_dir_all("data")?;
    }
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 5. Provision configured users with their starter accounts and categories
    let report = seed::seed_users(&db, &app_config.users)
        .await
        .inspect_err(|e| error!("Failed to seed users: {e}"))?;
    info!(
        users = report.users,
        accounts = report.accounts,
        categories = report.categories,
        "Seeding finished"
    );

    // 6. Serve until Ctrl-C
    let state = AppState::new(db, Clock::system(timezone), Arc::new(app_config));
    web::serve(state).await
}
