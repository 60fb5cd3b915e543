//! User endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Serialize;
use tourbook_core::Role;

use super::InsertResponse;
use crate::accounts::CreateUserOutcome;
use crate::error::ServerError;
use crate::guard::Identity;
use crate::state::AppState;
use crate::store::{DocumentStore, UpdateResult, User};

/// POST /users
/// Register a user on first sign-in; repeat sign-ins are a no-op
pub async fn create_user<D>(
    State(state): State<Arc<AppState<D>>>,
    Json(user): Json<User>,
) -> Result<Json<InsertResponse>, ServerError>
where
    D: DocumentStore + 'static,
{
    let response = match state.accounts.create_user(user).await? {
        CreateUserOutcome::Created(id) => InsertResponse::inserted(id),
        CreateUserOutcome::AlreadyExists => InsertResponse::existing("User already exists"),
    };
    Ok(Json(response))
}

/// GET /users
pub async fn list_users<D>(
    State(state): State<Arc<AppState<D>>>,
) -> Result<Json<Vec<User>>, ServerError>
where
    D: DocumentStore + 'static,
{
    Ok(Json(state.accounts.list_users().await?))
}

#[derive(Serialize)]
pub struct AdminCheckResponse {
    pub admin: bool,
}

#[derive(Serialize)]
pub struct GuideCheckResponse {
    pub guide: bool,
}

/// GET /users/admin/:email
pub async fn check_admin<D>(
    State(state): State<Arc<AppState<D>>>,
    Extension(identity): Extension<Identity>,
    Path(email): Path<String>,
) -> Result<Json<AdminCheckResponse>, ServerError>
where
    D: DocumentStore + 'static,
{
    identity.ensure_self(&email)?;
    let admin = state.accounts.check_role(&email, Role::Admin).await?;
    Ok(Json(AdminCheckResponse { admin }))
}

/// GET /users/guide/:email
pub async fn check_guide<D>(
    State(state): State<Arc<AppState<D>>>,
    Extension(identity): Extension<Identity>,
    Path(email): Path<String>,
) -> Result<Json<GuideCheckResponse>, ServerError>
where
    D: DocumentStore + 'static,
{
    identity.ensure_self(&email)?;
    let guide = state.accounts.check_role(&email, Role::Guide).await?;
    Ok(Json(GuideCheckResponse { guide }))
}

/// PATCH /users/admin/:id
pub async fn make_admin<D>(
    State(state): State<Arc<AppState<D>>>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, ServerError>
where
    D: DocumentStore + 'static,
{
    Ok(Json(state.accounts.grant_role(&id, Role::Admin).await?))
}

/// PATCH /users/guide/:id
pub async fn make_guide<D>(
    State(state): State<Arc<AppState<D>>>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, ServerError>
where
    D: DocumentStore + 'static,
{
    Ok(Json(state.accounts.grant_role(&id, Role::Guide).await?))
}
