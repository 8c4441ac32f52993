//! Application settings loaded from `config.toml`.
//!
//! Every section is optional; a missing file or a missing key falls back to
//! the built-in defaults so a bare checkout can start without configuration.

use crate::entities::{AccountType, CategoryKind};
use crate::errors::{Error, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "PLANBOOK_CONFIG";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Planner behaviour
    pub planner: PlannerConfig,
    /// Users provisioned on startup
    pub users: Vec<UserSeed>,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `127.0.0.1:8000`
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Planner behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// IANA timezone used for every local date and time
    pub timezone: String,
    /// Where unauthenticated page requests are sent
    pub login_url: String,
    /// Request header carrying the authenticated username
    pub identity_header: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            timezone: "Asia/Seoul".to_string(),
            login_url: "/admin/login/".to_string(),
            identity_header: "x-remote-user".to_string(),
        }
    }
}

impl PlannerConfig {
    /// Parses the configured timezone name.
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>().map_err(|e| Error::Config {
            message: format!("Unknown timezone '{}': {e}", self.timezone),
        })
    }
}

/// A user to provision, with optional starter accounts and categories
#[derive(Debug, Clone, Deserialize)]
pub struct UserSeed {
    /// Login name
    pub username: String,
    /// Accounts created for the user if missing
    #[serde(default)]
    pub accounts: Vec<AccountSeed>,
    /// Categories created for the user if missing
    #[serde(default)]
    pub categories: Vec<CategorySeed>,
}

/// Starter account
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSeed {
    /// Account name
    pub name: String,
    /// Account type, cash when omitted
    #[serde(default, rename = "type")]
    pub account_type: AccountType,
}

/// Starter category
#[derive(Debug, Clone, Deserialize)]
pub struct CategorySeed {
    /// Category name
    pub name: String,
    /// Expense, income or transfer
    pub kind: CategoryKind,
}

/// Loads the application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - The configured timezone is unknown
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading configuration from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    parse_config(&contents)
}

/// Parses configuration text and validates the timezone.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.planner.timezone()?;
    Ok(config)
}

/// Loads configuration from `$PLANBOOK_CONFIG` or `./config.toml`.
///
/// A missing file yields the defaults; an unreadable or invalid one is an error.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        load_config(&path)
    } else {
        tracing::info!("No configuration file at {path}, using defaults");
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [server]
            bind = "0.0.0.0:9000"

            [planner]
            timezone = "Europe/Berlin"
            login_url = "/login/"
            identity_header = "x-user"

            [[users]]
            username = "alice"
            accounts = [{ name = "Wallet" }, { name = "Visa", type = "card" }]
            categories = [{ name = "Food", kind = "expense" }]
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.planner.timezone().unwrap(), chrono_tz::Europe::Berlin);
        assert_eq!(config.planner.login_url, "/login/");
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.users[0].accounts[0].account_type, AccountType::Cash);
        assert_eq!(config.users[0].accounts[1].account_type, AccountType::Card);
        assert_eq!(config.users[0].categories[0].kind, CategoryKind::Expense);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8000");
        assert_eq!(config.planner.timezone().unwrap(), chrono_tz::Asia::Seoul);
        assert_eq!(config.planner.identity_header, "x-remote-user");
        assert!(config.users.is_empty());
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        let result = parse_config("[planner]\ntimezone = \"Mars/Olympus\"\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
