//! Owner resolution.
//!
//! The fronting proxy authenticates the user and forwards the username in a
//! trusted header (`x-remote-user` unless configured otherwise). The name must
//! match a row in `users`; anything else counts as anonymous.

use crate::{core::user, entities::user as user_entity, web::AppState};
use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;

/// Owner of a page request; anonymous requests are sent to the login page
#[derive(Debug, Clone)]
pub struct PageUser(pub user_entity::Model);

/// Owner of an API request; anonymous requests get 401
#[derive(Debug, Clone)]
pub struct ApiUser(pub user_entity::Model);

async fn resolve_owner(
    parts: &Parts,
    state: &AppState,
) -> Result<Option<user_entity::Model>, Response> {
    let header = state.config.planner.identity_header.as_str();
    let Some(username) = parts
        .headers
        .get(header)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    else {
        return Ok(None);
    };

    let owner = user::get_user_by_username(&state.db, username)
        .await
        .map_err(IntoResponse::into_response)?;
    if owner.is_none() {
        tracing::warn!(username, "Identity header names an unknown user");
    }
    Ok(owner)
}

/// `<login_url>?next=<path>` for the request being rejected.
#[must_use]
pub fn login_location(login_url: &str, path: &str) -> String {
    format!("{login_url}?next={path}")
}

#[axum::async_trait]
impl FromRequestParts<AppState> for PageUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match resolve_owner(parts, state).await? {
            Some(owner) => Ok(Self(owner)),
            None => {
                let location = login_location(&state.config.planner.login_url, parts.uri.path());
                Err(Redirect::to(&location).into_response())
            }
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for ApiUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match resolve_owner(parts, state).await? {
            Some(owner) => Ok(Self(owner)),
            None => Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Authentication required" })),
            )
                .into_response()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_location() {
        assert_eq!(
            login_location("/admin/login/", "/planner/day/"),
            "/admin/login/?next=/planner/day/"
        );
    }
}
