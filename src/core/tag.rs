//! Tag business logic. Tags are global and shared by every owner's tasks.

use crate::{
    entities::{Tag, tag},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Color used when a tag is created without one
pub const DEFAULT_TAG_COLOR: &str = "#888888";

/// Partial update of a tag
#[derive(Debug, Clone, Default)]
pub struct TagChanges {
    /// New name
    pub name: Option<String>,
    /// New `#RRGGBB` color
    pub color: Option<String>,
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Tag name cannot be empty"));
    }
    Ok(name.to_string())
}

/// Checks for a `#RRGGBB` hex color.
fn validate_color(color: &str) -> Result<String> {
    let color = color.trim();
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(Error::validation(format!(
            "Tag color must look like #RRGGBB, got '{color}'"
        )));
    }
    Ok(color.to_string())
}

/// Lists all tags ordered by name.
pub async fn list_tags(db: &DatabaseConnection) -> Result<Vec<tag::Model>> {
    Tag::find()
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a tag by id.
pub async fn get_tag(db: &DatabaseConnection, tag_id: i64) -> Result<Option<tag::Model>> {
    Tag::find_by_id(tag_id).one(db).await.map_err(Into::into)
}

/// Creates a tag; `color` defaults to [`DEFAULT_TAG_COLOR`].
pub async fn create_tag(
    db: &DatabaseConnection,
    name: &str,
    color: Option<&str>,
) -> Result<tag::Model> {
    let tag = tag::ActiveModel {
        name: Set(validate_name(name)?),
        color: Set(validate_color(color.unwrap_or(DEFAULT_TAG_COLOR))?),
        ..Default::default()
    };
    let result = tag.insert(db).await?;
    tracing::info!(tag_id = result.id, name = %result.name, "Created tag");
    Ok(result)
}

/// Applies a partial update to a tag.
pub async fn update_tag(
    db: &DatabaseConnection,
    tag_id: i64,
    changes: TagChanges,
) -> Result<tag::Model> {
    let existing = get_tag(db, tag_id).await?.ok_or(Error::NotFound {
        entity: "tag",
        id: tag_id,
    })?;
    let mut active: tag::ActiveModel = existing.into();

    if let Some(name) = changes.name {
        active.name = Set(validate_name(&name)?);
    }
    if let Some(color) = changes.color {
        active.color = Set(validate_color(&color)?);
    }

    active.update(db).await.map_err(Into::into)
}

/// Deletes a tag. Its task links go with it; the tasks stay.
pub async fn delete_tag(db: &DatabaseConnection, tag_id: i64) -> Result<()> {
    let result = Tag::delete_by_id(tag_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "tag",
            id: tag_id,
        });
    }
    tracing::info!(tag_id, "Deleted tag");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    #[test]
    fn test_validate_color() {
        assert!(validate_color("#a1B2c3").is_ok());
        assert!(validate_color("a1b2c3").is_err());
        assert!(validate_color("#12345").is_err());
        assert!(validate_color("#12345g").is_err());
        assert!(validate_color("#ééé").is_err());
    }

    #[tokio::test]
    async fn test_create_tag_uses_default_color() -> Result<()> {
        let db = setup_test_db().await?;
        let tag = create_tag(&db, "work", None).await?;
        assert_eq!(tag.color, DEFAULT_TAG_COLOR);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_update_delete_tags() -> Result<()> {
        let db = setup_test_db().await?;
        let work = create_tag(&db, "work", Some("#ff0000")).await?;
        create_tag(&db, "home", None).await?;

        let names: Vec<String> = list_tags(&db).await?.into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["home", "work"]);

        let updated = update_tag(
            &db,
            work.id,
            TagChanges {
                color: Some("#00ff00".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.color, "#00ff00");
        assert_eq!(updated.name, "work");

        let bad = update_tag(
            &db,
            work.id,
            TagChanges {
                color: Some("green".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(bad, Err(Error::Validation { .. })));

        delete_tag(&db, work.id).await?;
        assert!(get_tag(&db, work.id).await?.is_none());
        assert!(matches!(
            delete_tag(&db, work.id).await,
            Err(Error::NotFound { entity: "tag", .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_tag_names_are_unique() -> Result<()> {
        let db = setup_test_db().await?;
        create_tag(&db, "work", None).await?;
        assert!(matches!(
            create_tag(&db, "work", None).await,
            Err(Error::Database(_))
        ));
        Ok(())
    }
}
