//! Task business logic - owner-scoped CRUD for tasks and their tag links.

use crate::{
    entities::{Priority, Tag, Task, TaskStatus, TaskTag, Transaction, tag, task, task_tag, transaction},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    LoaderTrait, QueryOrder, QuerySelect, Set, TransactionTrait, Value, prelude::*,
    sea_query::Expr,
};
use serde::Serialize;
use std::collections::BTreeSet;

/// Number of tasks returned by [`upcoming_tasks`]
pub const UPCOMING_LIMIT: u64 = 10;

/// Input for creating a task
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    /// Title, required
    pub title: String,
    /// Free-form notes
    pub description: String,
    /// Defaults to medium
    pub priority: Priority,
    /// Defaults to todo
    pub status: TaskStatus,
    /// Scheduled start
    pub start_at: Option<DateTime<Utc>>,
    /// Due timestamp
    pub due_at: Option<DateTime<Utc>>,
    /// Whole-day task
    pub is_all_day: bool,
    /// Tags to attach; every id must exist
    pub tag_ids: Vec<i64>,
}

/// Partial update of a task.
///
/// The outer `Option` of a nullable field says whether to touch it, the inner
/// one whether to clear it.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    /// New title
    pub title: Option<String>,
    /// New notes
    pub description: Option<String>,
    /// New priority
    pub priority: Option<Priority>,
    /// New status
    pub status: Option<TaskStatus>,
    /// New start, or `Some(None)` to clear it
    pub start_at: Option<Option<DateTime<Utc>>>,
    /// New due timestamp, or `Some(None)` to clear it
    pub due_at: Option<Option<DateTime<Utc>>>,
    /// New all-day flag
    pub is_all_day: Option<bool>,
    /// Replaces the whole tag set
    pub tag_ids: Option<Vec<i64>>,
}

/// A task together with its tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskWithTags {
    /// The stored task
    #[serde(flatten)]
    pub task: task::Model,
    /// Attached tags, ordered by name
    pub tags: Vec<tag::Model>,
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::validation("Task title cannot be empty"));
    }
    Ok(title.to_string())
}

/// Replaces the tag links of `task_id` with `tag_ids`. Unknown tag ids are rejected.
async fn replace_tags<C>(db: &C, task_id: i64, tag_ids: &[i64]) -> Result<()>
where
    C: ConnectionTrait,
{
    let wanted: BTreeSet<i64> = tag_ids.iter().copied().collect();
    if !wanted.is_empty() {
        let found: Vec<i64> = Tag::find()
            .select_only()
            .column(tag::Column::Id)
            .filter(tag::Column::Id.is_in(wanted.iter().copied()))
            .into_tuple()
            .all(db)
            .await?;
        if let Some(missing) = wanted.iter().find(|id| !found.contains(id)) {
            return Err(Error::NotFound {
                entity: "tag",
                id: *missing,
            });
        }
    }

    TaskTag::delete_many()
        .filter(task_tag::Column::TaskId.eq(task_id))
        .exec(db)
        .await?;
    if !wanted.is_empty() {
        let links = wanted.into_iter().map(|tag_id| task_tag::ActiveModel {
            task_id: Set(task_id),
            tag_id: Set(tag_id),
        });
        TaskTag::insert_many(links).exec(db).await?;
    }
    Ok(())
}

async fn tags_of<C>(db: &C, task: &task::Model) -> Result<Vec<tag::Model>>
where
    C: ConnectionTrait,
{
    task.find_related(Tag)
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Inserts a task and its tag links on an existing connection or transaction.
pub async fn insert_task<C>(db: &C, owner_id: i64, input: NewTask) -> Result<task::Model>
where
    C: ConnectionTrait,
{
    let now = Utc::now();
    let task = task::ActiveModel {
        owner_id: Set(owner_id),
        title: Set(validate_title(&input.title)?),
        description: Set(input.description),
        priority: Set(input.priority),
        status: Set(input.status),
        start_at: Set(input.start_at),
        due_at: Set(input.due_at),
        is_all_day: Set(input.is_all_day),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let task = task.insert(db).await?;
    replace_tags(db, task.id, &input.tag_ids).await?;
    tracing::info!(owner_id, task_id = task.id, "Created task");
    Ok(task)
}

/// Creates a task with its tags in one database transaction.
pub async fn create_task(
    db: &DatabaseConnection,
    owner_id: i64,
    input: NewTask,
) -> Result<TaskWithTags> {
    let txn = db.begin().await?;
    let task = insert_task(&txn, owner_id, input).await?;
    let tags = tags_of(&txn, &task).await?;
    txn.commit().await?;
    Ok(TaskWithTags { task, tags })
}

/// Lists the owner's tasks, newest first, with their tags.
pub async fn list_tasks(db: &DatabaseConnection, owner_id: i64) -> Result<Vec<TaskWithTags>> {
    let tasks = Task::find()
        .filter(task::Column::OwnerId.eq(owner_id))
        .order_by_desc(task::Column::CreatedAt)
        .order_by_desc(task::Column::Id)
        .all(db)
        .await?;
    let tags = tasks.load_many_to_many(Tag, TaskTag, db).await?;

    Ok(tasks
        .into_iter()
        .zip(tags)
        .map(|(task, mut tags)| {
            tags.sort_by(|a, b| a.name.cmp(&b.name));
            TaskWithTags { task, tags }
        })
        .collect())
}

async fn find_owned<C>(db: &C, owner_id: i64, task_id: i64) -> Result<task::Model>
where
    C: ConnectionTrait,
{
    get_owned_task(db, owner_id, task_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "task",
            id: task_id,
        })
}

/// Finds one of the owner's tasks, if it exists, on any connection.
pub async fn get_owned_task<C>(db: &C, owner_id: i64, task_id: i64) -> Result<Option<task::Model>>
where
    C: ConnectionTrait,
{
    Task::find_by_id(task_id)
        .filter(task::Column::OwnerId.eq(owner_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds one of the owner's tasks with its tags.
pub async fn get_task(
    db: &DatabaseConnection,
    owner_id: i64,
    task_id: i64,
) -> Result<Option<TaskWithTags>> {
    match get_owned_task(db, owner_id, task_id).await? {
        Some(task) => {
            let tags = tags_of(db, &task).await?;
            Ok(Some(TaskWithTags { task, tags }))
        }
        None => Ok(None),
    }
}

/// Applies a partial update and refreshes `updated_at`.
pub async fn update_task(
    db: &DatabaseConnection,
    owner_id: i64,
    task_id: i64,
    changes: TaskChanges,
) -> Result<TaskWithTags> {
    let txn = db.begin().await?;
    let mut active: task::ActiveModel = find_owned(&txn, owner_id, task_id).await?.into();

    if let Some(title) = changes.title {
        active.title = Set(validate_title(&title)?);
    }
    if let Some(description) = changes.description {
        active.description = Set(description);
    }
    if let Some(priority) = changes.priority {
        active.priority = Set(priority);
    }
    if let Some(status) = changes.status {
        active.status = Set(status);
    }
    if let Some(start_at) = changes.start_at {
        active.start_at = Set(start_at);
    }
    if let Some(due_at) = changes.due_at {
        active.due_at = Set(due_at);
    }
    if let Some(is_all_day) = changes.is_all_day {
        active.is_all_day = Set(is_all_day);
    }
    active.updated_at = Set(Utc::now());

    let task = active.update(&txn).await?;
    if let Some(tag_ids) = changes.tag_ids {
        replace_tags(&txn, task.id, &tag_ids).await?;
    }
    let tags = tags_of(&txn, &task).await?;
    txn.commit().await?;

    Ok(TaskWithTags { task, tags })
}

/// Deletes one of the owner's tasks. Linked transactions stay, unlinked.
pub async fn delete_task(db: &DatabaseConnection, owner_id: i64, task_id: i64) -> Result<()> {
    let txn = db.begin().await?;
    let task = find_owned(&txn, owner_id, task_id).await?;

    let unlinked = Transaction::update_many()
        .col_expr(transaction::Column::TaskId, Expr::value(Value::BigInt(None)))
        .filter(transaction::Column::TaskId.eq(task_id))
        .exec(&txn)
        .await?;
    task.delete(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        owner_id,
        task_id,
        unlinked = unlinked.rows_affected,
        "Deleted task"
    );
    Ok(())
}

/// The owner's tasks with the earliest due timestamps. Tasks without one are skipped.
pub async fn upcoming_tasks(db: &DatabaseConnection, owner_id: i64) -> Result<Vec<task::Model>> {
    Task::find()
        .filter(task::Column::OwnerId.eq(owner_id))
        .filter(task::Column::DueAt.is_not_null())
        .order_by_asc(task::Column::DueAt)
        .order_by_asc(task::Column::Id)
        .limit(UPCOMING_LIMIT)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::tag::create_tag;
    use crate::entities::CategoryKind;
    use crate::test_utils::*;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_create_task_defaults_and_tags() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "alice").await?;
        let work = create_tag(&db, "work", None).await?;
        let deep = create_tag(&db, "deep", None).await?;

        let created = create_task(
            &db,
            owner.id,
            NewTask {
                title: "Write report".to_string(),
                tag_ids: vec![work.id, deep.id, work.id],
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(created.task.priority, Priority::Medium);
        assert_eq!(created.task.status, TaskStatus::Todo);
        assert!(!created.task.is_all_day);
        let names: Vec<&str> = created.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["deep", "work"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_task_with_unknown_tag_is_atomic() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "alice").await?;

        let result = create_task(
            &db,
            owner.id,
            NewTask {
                title: "Orphan".to_string(),
                tag_ids: vec![404],
                ..Default::default()
            },
        )
        .await;

        assert!(matches!(result, Err(Error::NotFound { entity: "tag", id: 404 })));
        assert!(list_tasks(&db, owner.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_task_requires_title() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "alice").await?;
        let result = create_task(&db, owner.id, NewTask::default()).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_clears_nullable_fields_and_replaces_tags() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "alice").await?;
        let home = create_tag(&db, "home", None).await?;
        let task = create_scheduled_task(
            &db,
            owner.id,
            "Plan",
            Some(local(2024, 3, 5, 9, 0)),
            Some(local(2024, 3, 5, 10, 0)),
        )
        .await?;

        let updated = update_task(
            &db,
            owner.id,
            task.id,
            TaskChanges {
                status: Some(TaskStatus::Done),
                start_at: Some(None),
                tag_ids: Some(vec![home.id]),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.task.status, TaskStatus::Done);
        assert!(updated.task.start_at.is_none());
        assert_eq!(updated.task.due_at, task.due_at);
        assert_eq!(updated.task.created_at, task.created_at);
        assert!(updated.task.updated_at >= task.updated_at);
        assert_eq!(updated.tags, vec![home]);
        Ok(())
    }

    #[tokio::test]
    async fn test_tasks_are_owner_scoped() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;
        let task = create_scheduled_task(&db, alice.id, "Mine", None, None).await?;

        assert!(get_task(&db, bob.id, task.id).await?.is_none());
        assert!(list_tasks(&db, bob.id).await?.is_empty());
        assert!(matches!(
            delete_task(&db, bob.id, task.id).await,
            Err(Error::NotFound { entity: "task", .. })
        ));
        assert!(get_task(&db, alice.id, task.id).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_task_keeps_transactions() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "alice").await?;
        let wallet = create_test_account(&db, owner.id, "Wallet").await?;
        let food = create_test_category(&db, owner.id, "Food", CategoryKind::Expense).await?;
        let task = create_scheduled_task(&db, owner.id, "Lunch", Some(local(2024, 3, 5, 12, 0)), None)
            .await?;
        let tx = create_test_transaction(
            &db,
            owner.id,
            wallet.id,
            food.id,
            Some(task.id),
            Decimal::new(800, 2),
            local(2024, 3, 5, 12, 10),
        )
        .await?;

        delete_task(&db, owner.id, task.id).await?;

        let kept = Transaction::find_by_id(tx.id).one(&db).await?.unwrap();
        assert_eq!(kept.task_id, None);
        assert_eq!(kept.amount, tx.amount);
        Ok(())
    }

    #[tokio::test]
    async fn test_upcoming_orders_by_due_and_skips_undated() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "alice").await?;
        create_scheduled_task(&db, owner.id, "Someday", None, None).await?;
        for day in (1..=12).rev() {
            create_scheduled_task(
                &db,
                owner.id,
                &format!("Due {day}"),
                None,
                Some(local(2024, 4, day, 9, 0)),
            )
            .await?;
        }

        let upcoming = upcoming_tasks(&db, owner.id).await?;
        assert_eq!(upcoming.len(), 10);
        assert_eq!(upcoming[0].title, "Due 1");
        assert_eq!(upcoming[9].title, "Due 10");
        assert!(upcoming.iter().all(|t| t.due_at.is_some()));
        Ok(())
    }
}
