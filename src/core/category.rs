//! Category business logic - owner-scoped CRUD for transaction categories.

use crate::{
    entities::{Category, CategoryKind, Transaction, category, transaction},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Partial update of a category
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    /// New name
    pub name: Option<String>,
    /// New kind
    pub kind: Option<CategoryKind>,
}

/// Lists the owner's categories ordered by name, optionally limited to one kind.
pub async fn list_categories(
    db: &DatabaseConnection,
    owner_id: i64,
    kind: Option<CategoryKind>,
) -> Result<Vec<category::Model>> {
    let mut query = Category::find().filter(category::Column::OwnerId.eq(owner_id));
    if let Some(kind) = kind {
        query = query.filter(category::Column::Kind.eq(kind));
    }
    query
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds one of the owner's categories.
pub async fn get_category<C>(
    db: &C,
    owner_id: i64,
    category_id: i64,
) -> Result<Option<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find_by_id(category_id)
        .filter(category::Column::OwnerId.eq(owner_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_category`] but a missing category is an error.
pub async fn require_category<C>(db: &C, owner_id: i64, category_id: i64) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    get_category(db, owner_id, category_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "category",
            id: category_id,
        })
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Category name cannot be empty"));
    }
    Ok(name.to_string())
}

/// Creates a category. `(name, kind)` must be unique per owner.
pub async fn create_category(
    db: &DatabaseConnection,
    owner_id: i64,
    name: &str,
    kind: CategoryKind,
) -> Result<category::Model> {
    let category = category::ActiveModel {
        owner_id: Set(owner_id),
        name: Set(validate_name(name)?),
        kind: Set(kind),
        ..Default::default()
    };

    let result = category.insert(db).await?;
    tracing::info!(owner_id, category_id = result.id, kind = kind.as_str(), "Created category");
    Ok(result)
}

/// Applies a partial update to one of the owner's categories.
pub async fn update_category(
    db: &DatabaseConnection,
    owner_id: i64,
    category_id: i64,
    changes: CategoryChanges,
) -> Result<category::Model> {
    let mut active: category::ActiveModel =
        require_category(db, owner_id, category_id).await?.into();

    if let Some(name) = changes.name {
        active.name = Set(validate_name(&name)?);
    }
    if let Some(kind) = changes.kind {
        active.kind = Set(kind);
    }

    active.update(db).await.map_err(Into::into)
}

/// Deletes one of the owner's categories unless transactions still use it.
/// Budget items for the category are removed with it.
pub async fn delete_category(
    db: &DatabaseConnection,
    owner_id: i64,
    category_id: i64,
) -> Result<()> {
    let existing = require_category(db, owner_id, category_id).await?;

    let references = Transaction::find()
        .filter(transaction::Column::CategoryId.eq(category_id))
        .count(db)
        .await?;
    if references > 0 {
        tracing::warn!(category_id, references, "Refusing to delete referenced category");
        return Err(Error::Protected {
            entity: "category",
            id: category_id,
            references,
        });
    }

    existing.delete(db).await?;
    tracing::info!(owner_id, category_id, "Deleted category");
    Ok(())
}
