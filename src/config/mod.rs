/// Database connection and schema creation
pub mod database;

/// Startup provisioning of configured users
pub mod seed;

/// Settings loaded from config.toml
pub mod settings;

pub use settings::{AppConfig, load_app_configuration};
