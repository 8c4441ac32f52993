//! Task and tag endpoints.

use crate::{
    core::{
        tag::{self, TagChanges},
        task::{self, NewTask, TaskChanges, TaskWithTags},
    },
    entities::{Priority, TaskStatus, tag as tag_entity, task as task_entity},
    errors::{Error, Result},
    web::{AppState, api::double_option, identity::ApiUser},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

/// Body of `POST /api/tasks`
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Title
    pub title: String,
    /// Notes
    #[serde(default)]
    pub description: String,
    /// Defaults to medium
    #[serde(default)]
    pub priority: Priority,
    /// Defaults to todo
    #[serde(default)]
    pub status: TaskStatus,
    /// RFC 3339 start
    pub start_at: Option<DateTime<FixedOffset>>,
    /// RFC 3339 due
    pub due_at: Option<DateTime<FixedOffset>>,
    /// Whole-day flag
    #[serde(default)]
    pub is_all_day: bool,
    /// Tag ids
    #[serde(default)]
    pub tags: Vec<i64>,
}

/// Body of `PATCH /api/tasks/:id`; `null` clears start or due
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title
    pub title: Option<String>,
    /// New notes
    pub description: Option<String>,
    /// New priority
    pub priority: Option<Priority>,
    /// New status
    pub status: Option<TaskStatus>,
    /// New start
    #[serde(default, deserialize_with = "double_option")]
    pub start_at: Option<Option<DateTime<FixedOffset>>>,
    /// New due timestamp
    #[serde(default, deserialize_with = "double_option")]
    pub due_at: Option<Option<DateTime<FixedOffset>>>,
    /// New all-day flag
    pub is_all_day: Option<bool>,
    /// Replacement tag ids
    pub tags: Option<Vec<i64>>,
}

/// Body of tag create and update
#[derive(Debug, Default, Deserialize)]
pub struct TagRequest {
    /// Name
    pub name: Option<String>,
    /// `#RRGGBB`
    pub color: Option<String>,
}

fn not_found(entity: &'static str, id: i64) -> Error {
    Error::NotFound { entity, id }
}

/// `GET /api/tasks`
pub async fn list_tasks(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
) -> Result<Json<Vec<TaskWithTags>>> {
    Ok(Json(task::list_tasks(&state.db, owner.id).await?))
}

/// `POST /api/tasks`
pub async fn create_task(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskWithTags>)> {
    let input = NewTask {
        title: body.title,
        description: body.description,
        priority: body.priority,
        status: body.status,
        start_at: body.start_at.map(|t| t.to_utc()),
        due_at: body.due_at.map(|t| t.to_utc()),
        is_all_day: body.is_all_day,
        tag_ids: body.tags,
    };
    let created = task::create_task(&state.db, owner.id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/tasks/upcoming`
pub async fn upcoming_tasks(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
) -> Result<Json<Vec<task_entity::Model>>> {
    Ok(Json(task::upcoming_tasks(&state.db, owner.id).await?))
}

/// `GET /api/tasks/:id`
pub async fn get_task(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Path(id): Path<i64>,
) -> Result<Json<TaskWithTags>> {
    task::get_task(&state.db, owner.id, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("task", id))
}

/// `PATCH /api/tasks/:id`
pub async fn update_task(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<Json<TaskWithTags>> {
    let changes = TaskChanges {
        title: body.title,
        description: body.description,
        priority: body.priority,
        status: body.status,
        start_at: body.start_at.map(|t| t.map(|t| t.to_utc())),
        due_at: body.due_at.map(|t| t.map(|t| t.to_utc())),
        is_all_day: body.is_all_day,
        tag_ids: body.tags,
    };
    Ok(Json(task::update_task(&state.db, owner.id, id, changes).await?))
}

/// `DELETE /api/tasks/:id`
pub async fn delete_task(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    task::delete_task(&state.db, owner.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/tags`
pub async fn list_tags(
    State(state): State<AppState>,
    ApiUser(_): ApiUser,
) -> Result<Json<Vec<tag_entity::Model>>> {
    Ok(Json(tag::list_tags(&state.db).await?))
}

/// `POST /api/tags`
pub async fn create_tag(
    State(state): State<AppState>,
    ApiUser(_): ApiUser,
    Json(body): Json<TagRequest>,
) -> Result<(StatusCode, Json<tag_entity::Model>)> {
    let name = body.name.unwrap_or_default();
    let created = tag::create_tag(&state.db, &name, body.color.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/tags/:id`
pub async fn get_tag(
    State(state): State<AppState>,
    ApiUser(_): ApiUser,
    Path(id): Path<i64>,
) -> Result<Json<tag_entity::Model>> {
    tag::get_tag(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("tag", id))
}

/// `PATCH /api/tags/:id`
pub async fn update_tag(
    State(state): State<AppState>,
    ApiUser(_): ApiUser,
    Path(id): Path<i64>,
    Json(body): Json<TagRequest>,
) -> Result<Json<tag_entity::Model>> {
    let changes = TagChanges {
        name: body.name,
        color: body.color,
    };
    Ok(Json(tag::update_tag(&state.db, id, changes).await?))
}

/// `DELETE /api/tags/:id`
pub async fn delete_tag(
    State(state): State<AppState>,
    ApiUser(_): ApiUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    tag::delete_tag(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
