//! Wishlist endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::InsertResponse;
use crate::error::ServerError;
use crate::guard::Identity;
use crate::state::AppState;
use crate::store::{Collection, DocumentStore, Filter, WishlistItem};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub package_id: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// POST /wishlist
/// Save a package for the token's owner; saving it twice is a no-op
pub async fn add_item<D>(
    State(state): State<Arc<AppState<D>>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<InsertResponse>, ServerError>
where
    D: DocumentStore + 'static,
{
    let existing = state
        .store
        .count(
            Collection::Wishlists,
            Filter::eq("email", identity.email.as_str()).and("packageId", req.package_id.as_str()),
        )
        .await?;
    if existing > 0 {
        return Ok(Json(InsertResponse::existing("Package already in wishlist")));
    }

    let mut details = req.details;
    for field in ["_id", "email", "addedAt"] {
        details.remove(field);
    }

    let item = WishlistItem {
        id: None,
        email: identity.email.clone(),
        package_id: req.package_id,
        added_at: Utc::now(),
        details,
    };
    let id = state.store.insert_one(Collection::Wishlists, &item).await?;
    Ok(Json(InsertResponse::inserted(id)))
}

/// GET /wishlist/:email
pub async fn list_items<D>(
    State(state): State<Arc<AppState<D>>>,
    Extension(identity): Extension<Identity>,
    Path(email): Path<String>,
) -> Result<Json<Vec<WishlistItem>>, ServerError>
where
    D: DocumentStore + 'static,
{
    identity.ensure_self(&email)?;
    let items = state
        .store
        .find(Collection::Wishlists, Filter::eq("email", email))
        .await?;
    Ok(Json(items))
}

#[derive(Serialize)]
pub struct RemoveItemResponse {
    pub success: bool,
}

/// DELETE /wishlist/:id
pub async fn remove_item<D>(
    State(state): State<Arc<AppState<D>>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<RemoveItemResponse>, ServerError>
where
    D: DocumentStore + 'static,
{
    let item: WishlistItem = state
        .store
        .find_one(Collection::Wishlists, Filter::by_id(&id))
        .await?
        .ok_or(ServerError::NotFound("Wishlist item"))?;
    if item.email != identity.email {
        return Err(ServerError::Forbidden);
    }

    state
        .store
        .delete_one(Collection::Wishlists, Filter::by_id(&id))
        .await?;
    Ok(Json(RemoveItemResponse { success: true }))
}
