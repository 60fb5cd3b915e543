//! Traveller stories

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::InsertResponse;
use crate::error::ServerError;
use crate::guard::Identity;
use crate::state::AppState;
use crate::store::{Collection, DocumentStore, Filter, Story};

#[derive(Deserialize)]
pub struct NewStory {
    pub title: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// GET /stories
pub async fn list_stories<D>(
    State(state): State<Arc<AppState<D>>>,
) -> Result<Json<Vec<Story>>, ServerError>
where
    D: DocumentStore + 'static,
{
    Ok(Json(state.store.find(Collection::Stories, Filter::all()).await?))
}

/// GET /stories/:id
pub async fn get_story<D>(
    State(state): State<Arc<AppState<D>>>,
    Path(id): Path<String>,
) -> Result<Json<Story>, ServerError>
where
    D: DocumentStore + 'static,
{
    state
        .store
        .find_one(Collection::Stories, Filter::by_id(&id))
        .await?
        .map(Json)
        .ok_or(ServerError::NotFound("Story"))
}

/// POST /stories
/// Publish a story authored by the token's owner
pub async fn create_story<D>(
    State(state): State<Arc<AppState<D>>>,
    Extension(identity): Extension<Identity>,
    Json(new): Json<NewStory>,
) -> Result<Json<InsertResponse>, ServerError>
where
    D: DocumentStore + 'static,
{
    if new.title.trim().is_empty() {
        return Err(ServerError::Validation("title is required".to_string()));
    }

    let mut details = new.details;
    for field in ["_id", "authorEmail", "createdAt"] {
        details.remove(field);
    }

    let story = Story {
        id: None,
        author_email: identity.email.clone(),
        title: new.title,
        created_at: Some(Utc::now()),
        details,
    };
    let id = state.store.insert_one(Collection::Stories, &story).await?;
    tracing::info!(story_id = %id, author = %identity.email, "Story published");
    Ok(Json(InsertResponse::inserted(id)))
}
