//! Account business logic - owner-scoped CRUD for accounts.
//!
//! An account cannot be deleted while transactions still reference it.

use crate::{
    entities::{Account, AccountType, Transaction, account, transaction},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Input for creating an account
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    /// Name, unique per owner
    pub name: String,
    /// Kind of account
    pub account_type: AccountType,
    /// Opening balance
    pub balance: Decimal,
}

/// Partial update of an account; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    /// New name
    pub name: Option<String>,
    /// New kind
    pub account_type: Option<AccountType>,
    /// New balance
    pub balance: Option<Decimal>,
}

/// Lists the owner's accounts, ordered by name.
pub async fn list_accounts(db: &DatabaseConnection, owner_id: i64) -> Result<Vec<account::Model>> {
    Account::find()
        .filter(account::Column::OwnerId.eq(owner_id))
        .order_by_asc(account::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds one of the owner's accounts; other owners' accounts are invisible.
pub async fn get_account<C>(db: &C, owner_id: i64, account_id: i64) -> Result<Option<account::Model>>
where
    C: ConnectionTrait,
{
    Account::find_by_id(account_id)
        .filter(account::Column::OwnerId.eq(owner_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_account`] but a missing account is an error.
pub async fn require_account<C>(db: &C, owner_id: i64, account_id: i64) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    get_account(db, owner_id, account_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "account",
            id: account_id,
        })
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Account name cannot be empty"));
    }
    Ok(name.to_string())
}

/// Creates an account for the owner.
pub async fn create_account(
    db: &DatabaseConnection,
    owner_id: i64,
    input: NewAccount,
) -> Result<account::Model> {
    let account = account::ActiveModel {
        owner_id: Set(owner_id),
        name: Set(validate_name(&input.name)?),
        account_type: Set(input.account_type),
        balance: Set(input.balance),
        ..Default::default()
    };

    let result = account.insert(db).await?;
    tracing::info!(owner_id, account_id = result.id, "Created account");
    Ok(result)
}

/// Applies a partial update to one of the owner's accounts.
pub async fn update_account(
    db: &DatabaseConnection,
    owner_id: i64,
    account_id: i64,
    changes: AccountChanges,
) -> Result<account::Model> {
    let existing = require_account(db, owner_id, account_id).await?;
    let mut active: account::ActiveModel = existing.into();

    if let Some(name) = changes.name {
        active.name = Set(validate_name(&name)?);
    }
    if let Some(account_type) = changes.account_type {
        active.account_type = Set(account_type);
    }
    if let Some(balance) = changes.balance {
        active.balance = Set(balance);
    }

    active.update(db).await.map_err(Into::into)
}

/// Deletes one of the owner's accounts.
///
/// Fails with [`Error::Protected`] while transactions reference the account.
pub async fn delete_account(db: &DatabaseConnection, owner_id: i64, account_id: i64) -> Result<()> {
    let existing = require_account(db, owner_id, account_id).await?;

    let references = Transaction::find()
        .filter(transaction::Column::AccountId.eq(account_id))
        .count(db)
        .await?;
    if references > 0 {
        tracing::warn!(account_id, references, "Refusing to delete referenced account");
        return Err(Error::Protected {
            entity: "account",
            id: account_id,
            references,
        });
    }

    existing.delete(db).await?;
    tracing::info!(owner_id, account_id, "Deleted account");
    Ok(())
}
