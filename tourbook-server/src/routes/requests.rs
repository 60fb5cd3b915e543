//! Role request endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{Map, Value};
use tourbook_core::Role;

use super::InsertResponse;
use crate::error::ServerError;
use crate::guard::Identity;
use crate::state::AppState;
use crate::store::{DocumentStore, User};

#[derive(Deserialize)]
pub struct RoleRequestBody {
    /// Requested role; most requests are to become a guide
    #[serde(default = "default_requested_role")]
    pub role: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

fn default_requested_role() -> String {
    Role::Guide.as_str().to_string()
}

/// POST /request
/// Ask for a role on behalf of the token's owner
pub async fn request_role<D>(
    State(state): State<Arc<AppState<D>>>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<RoleRequestBody>,
) -> Result<Json<InsertResponse>, ServerError>
where
    D: DocumentStore + 'static,
{
    let desired = Role::requested(&body.role)?;

    // The requester is whoever holds the token, whatever the body says
    let mut details = body.details;
    for field in ["_id", "email", "createdAt"] {
        details.remove(field);
    }

    let id = state
        .accounts
        .request_role(&identity.email, desired, body.reason, details)
        .await?;
    Ok(Json(InsertResponse::inserted(id)))
}

/// GET /request
/// Users waiting for a role decision
pub async fn list_pending<D>(
    State(state): State<Arc<AppState<D>>>,
) -> Result<Json<Vec<User>>, ServerError>
where
    D: DocumentStore + 'static,
{
    Ok(Json(state.accounts.list_pending().await?))
}
