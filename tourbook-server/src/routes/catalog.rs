//! Packages, tour types and tour guides

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use super::InsertResponse;
use crate::error::ServerError;
use crate::state::AppState;
use crate::store::{Collection, DocumentStore, Filter, Package, TourGuide, TourType};

/// GET /packages
pub async fn list_packages<D>(
    State(state): State<Arc<AppState<D>>>,
) -> Result<Json<Vec<Package>>, ServerError>
where
    D: DocumentStore + 'static,
{
    Ok(Json(state.store.find(Collection::Packages, Filter::all()).await?))
}

/// GET /packages/:id
pub async fn get_package<D>(
    State(state): State<Arc<AppState<D>>>,
    Path(id): Path<String>,
) -> Result<Json<Package>, ServerError>
where
    D: DocumentStore + 'static,
{
    state
        .store
        .find_one(Collection::Packages, Filter::by_id(&id))
        .await?
        .map(Json)
        .ok_or(ServerError::NotFound("Package"))
}

/// POST /packages
pub async fn create_package<D>(
    State(state): State<Arc<AppState<D>>>,
    Json(mut package): Json<Package>,
) -> Result<Json<InsertResponse>, ServerError>
where
    D: DocumentStore + 'static,
{
    if package.tour_type.trim().is_empty() {
        return Err(ServerError::Validation("tour_type is required".to_string()));
    }
    package.id = None;

    let id = state.store.insert_one(Collection::Packages, &package).await?;
    tracing::info!(package_id = %id, tour_type = %package.tour_type, "Package created");
    Ok(Json(InsertResponse::inserted(id)))
}

/// GET /packages/tour-type/:tour_type
pub async fn packages_by_tour_type<D>(
    State(state): State<Arc<AppState<D>>>,
    Path(tour_type): Path<String>,
) -> Result<Json<Vec<Package>>, ServerError>
where
    D: DocumentStore + 'static,
{
    let packages = state
        .store
        .find(Collection::Packages, Filter::eq("tour_type", tour_type))
        .await?;
    Ok(Json(packages))
}

/// GET /tourType
pub async fn list_tour_types<D>(
    State(state): State<Arc<AppState<D>>>,
) -> Result<Json<Vec<TourType>>, ServerError>
where
    D: DocumentStore + 'static,
{
    Ok(Json(state.store.find(Collection::TourTypes, Filter::all()).await?))
}

/// GET /tourGuides
pub async fn list_guides<D>(
    State(state): State<Arc<AppState<D>>>,
) -> Result<Json<Vec<TourGuide>>, ServerError>
where
    D: DocumentStore + 'static,
{
    Ok(Json(state.store.find(Collection::TourGuides, Filter::all()).await?))
}

/// GET /tourGuides/:id
pub async fn get_guide<D>(
    State(state): State<Arc<AppState<D>>>,
    Path(id): Path<String>,
) -> Result<Json<TourGuide>, ServerError>
where
    D: DocumentStore + 'static,
{
    state
        .store
        .find_one(Collection::TourGuides, Filter::by_id(&id))
        .await?
        .map(Json)
        .ok_or(ServerError::NotFound("Tour guide"))
}
