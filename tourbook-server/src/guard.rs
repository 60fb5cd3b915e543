//! Request guards
//!
//! [`authenticate`] verifies the bearer token and attaches the caller's
//! [`Identity`]. [`require_admin`] and [`require_guide`] run after it and
//! re-read the caller's role from the store on every request; the token
//! only carries an email, so a role granted or revoked after sign-in takes
//! effect immediately.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use tourbook_core::{Claims, Role};

use crate::error::ServerError;
use crate::state::AppState;
use crate::store::DocumentStore;

/// Verified caller identity, taken from the access token only
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub email: String,
    pub claims: Claims,
}

impl Identity {
    /// Reject unless the caller is acting on their own email
    pub fn ensure_self(&self, email: &str) -> Result<(), ServerError> {
        if self.email != email {
            return Err(ServerError::Forbidden);
        }
        Ok(())
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
///
/// Only an absent header counts as "no token"; a header that is present
/// but not a usable bearer token is an invalid token.
fn bearer_token(headers: &HeaderMap) -> Result<&str, ServerError> {
    let value = headers.get(AUTHORIZATION).ok_or(ServerError::NoToken)?;
    value
        .to_str()
        .ok()
        .and_then(|value| value.split_once(' '))
        .map(|(scheme, token)| (scheme, token.trim()))
        .filter(|(scheme, token)| scheme.eq_ignore_ascii_case("bearer") && !token.is_empty())
        .map(|(_, token)| token)
        .ok_or(ServerError::InvalidToken)
}

/// Verify the access token and attach the caller's identity
pub async fn authenticate<D>(
    State(state): State<Arc<AppState<D>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServerError>
where
    D: DocumentStore + 'static,
{
    let token = bearer_token(req.headers()).inspect_err(|e| {
        tracing::debug!(error = %e, "Rejected authorization header");
    })?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected access token");
        ServerError::InvalidToken
    })?;

    req.extensions_mut().insert(Identity {
        email: claims.email.clone(),
        claims,
    });
    Ok(next.run(req).await)
}

async fn require_role<D>(
    state: &AppState<D>,
    req: Request,
    next: Next,
    role: Role,
) -> Result<Response, ServerError>
where
    D: DocumentStore + 'static,
{
    let email = req
        .extensions()
        .get::<Identity>()
        .map(|identity| identity.email.clone())
        .ok_or(ServerError::NoToken)?;

    if !state.accounts.check_role(&email, role).await? {
        tracing::warn!(email = %email, required = %role, "Role check failed");
        return Err(ServerError::Forbidden);
    }
    Ok(next.run(req).await)
}

/// Allow only callers whose stored role is `admin`
pub async fn require_admin<D>(
    State(state): State<Arc<AppState<D>>>,
    req: Request,
    next: Next,
) -> Result<Response, ServerError>
where
    D: DocumentStore + 'static,
{
    require_role(&state, req, next, Role::Admin).await
}

/// Allow only callers whose stored role is `guide`
pub async fn require_guide<D>(
    State(state): State<Arc<AppState<D>>>,
    req: Request,
    next: Next,
) -> Result<Response, ServerError>
where
    D: DocumentStore + 'static,
{
    require_role(&state, req, next, Role::Guide).await
}
