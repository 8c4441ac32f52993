//! Startup provisioning of users, accounts and categories from `config.toml`.
//!
//! Seeding is idempotent: rows that already exist are left alone, so it runs
//! on every start.

use crate::{
    config::settings::UserSeed,
    core::{
        account::{self, NewAccount},
        category, user,
    },
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing::{debug, info};

/// Number of rows created by one seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// New users
    pub users: usize,
    /// New accounts
    pub accounts: usize,
    /// New categories
    pub categories: usize,
}

/// Creates every configured user, account and category that does not exist yet.
pub async fn seed_users(db: &DatabaseConnection, seeds: &[UserSeed]) -> Result<SeedReport> {
    info!("Seeding {} configured user(s)", seeds.len());
    let mut report = SeedReport::default();

    for seed in seeds {
        let owner = match user::get_user_by_username(db, seed.username.trim()).await? {
            Some(existing) => existing,
            None => {
                report.users += 1;
                user::create_user(db, &seed.username).await?
            }
        };

        let accounts = account::list_accounts(db, owner.id).await?;
        for wanted in &seed.accounts {
            if accounts.iter().any(|a| a.name == wanted.name.trim()) {
                debug!(username = %owner.username, account = %wanted.name, "Account exists, skipping");
                continue;
            }
            account::create_account(
                db,
                owner.id,
                NewAccount {
                    name: wanted.name.clone(),
                    account_type: wanted.account_type,
                    ..Default::default()
                },
            )
            .await?;
            report.accounts += 1;
        }

        let categories = category::list_categories(db, owner.id, None).await?;
        for wanted in &seed.categories {
            if categories
                .iter()
                .any(|c| c.name == wanted.name.trim() && c.kind == wanted.kind)
            {
                debug!(username = %owner.username, category = %wanted.name, "Category exists, skipping");
                continue;
            }
            category::create_category(db, owner.id, &wanted.name, wanted.kind).await?;
            report.categories += 1;
        }
    }

    info!(
        users = report.users,
        accounts = report.accounts,
        categories = report.categories,
        "Seeding finished"
    );
    Ok(report)
}
