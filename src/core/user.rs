//! User business logic - provisioning and lookup of owner identities.

use crate::{
    entities::{Transaction, User, transaction, user},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};

/// Finds a user by the username supplied by the identity header.
pub async fn get_user_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a user by id.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Creates a new user. The username is trimmed and must not be empty.
pub async fn create_user(db: &DatabaseConnection, username: &str) -> Result<user::Model> {
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::validation("Username cannot be empty"));
    }

    let user = user::ActiveModel {
        username: Set(username.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let result = user.insert(db).await?;
    tracing::info!(user_id = result.id, username, "Created user");
    Ok(result)
}

/// Returns the existing user with this name, creating it when missing.
pub async fn get_or_create_user(db: &DatabaseConnection, username: &str) -> Result<user::Model> {
    match get_user_by_username(db, username.trim()).await? {
        Some(user) => Ok(user),
        None => create_user(db, username).await,
    }
}

/// Deletes a user. Every row the user owns goes with it.
///
/// Transactions are removed before the user row; accounts and categories
/// refuse deletion while anything still references them.
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    Transaction::delete_many()
        .filter(transaction::Column::OwnerId.eq(user_id))
        .exec(&txn)
        .await?;
    let result = User::delete_by_id(user_id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "user",
            id: user_id,
        });
    }

    txn.commit().await?;
    tracing::info!(user_id, "Deleted user");
    Ok(())
}
