//! Token issuance endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::error::ServerError;
use crate::state::AppState;
use crate::store::DocumentStore;

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /jwt
/// Sign the posted identity claim into an access token
pub async fn issue_token<D>(
    State(state): State<Arc<AppState<D>>>,
    Json(identity): Json<Value>,
) -> Result<Json<TokenResponse>, ServerError>
where
    D: DocumentStore + 'static,
{
    let token = state.tokens.issue(&identity)?;

    tracing::debug!(email = ?identity.get("email"), "Issued access token");
    Ok(Json(TokenResponse { token }))
}
