//! Booking endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tourbook_core::BookingStatus;

use crate::bookings::NewBooking;
use crate::error::ServerError;
use crate::guard::Identity;
use crate::state::AppState;
use crate::store::{Booking, DocumentStore};

/// POST /bookings
/// Book a package for the token's owner
pub async fn create_booking<D>(
    State(state): State<Arc<AppState<D>>>,
    Extension(identity): Extension<Identity>,
    Json(new): Json<NewBooking>,
) -> Result<Json<Booking>, ServerError>
where
    D: DocumentStore + 'static,
{
    Ok(Json(state.bookings.create(&identity.email, new).await?))
}

/// GET /bookings/customer/:email
pub async fn list_for_customer<D>(
    State(state): State<Arc<AppState<D>>>,
    Extension(identity): Extension<Identity>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Booking>>, ServerError>
where
    D: DocumentStore + 'static,
{
    identity.ensure_self(&email)?;
    Ok(Json(state.bookings.find_by_customer(&email).await?))
}

/// GET /bookings/tour-guide/:email
pub async fn list_for_guide<D>(
    State(state): State<Arc<AppState<D>>>,
    Extension(identity): Extension<Identity>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Booking>>, ServerError>
where
    D: DocumentStore + 'static,
{
    identity.ensure_self(&email)?;
    Ok(Json(state.bookings.find_by_guide_email(&email).await?))
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Serialize)]
pub struct StatusUpdateResponse {
    pub success: bool,
    pub status: BookingStatus,
}

/// PATCH /bookings/:id/status
/// Accept or reject a booking assigned to the calling guide
pub async fn update_status<D>(
    State(state): State<Arc<AppState<D>>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<StatusUpdateResponse>, ServerError>
where
    D: DocumentStore + 'static,
{
    let to: BookingStatus = req.status.parse()?;

    let booking = state
        .bookings
        .get(&id)
        .await?
        .ok_or(ServerError::NotFound("Booking"))?;
    if booking.guide_email != identity.email {
        tracing::warn!(booking_id = %id, guide = %identity.email, "Guide does not own booking");
        return Err(ServerError::Forbidden);
    }

    let updated = state.bookings.update_status(&id, to).await?;
    Ok(Json(StatusUpdateResponse {
        success: true,
        status: updated.status,
    }))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// DELETE /bookings/:id
/// Cancel one of the caller's own bookings
pub async fn delete_booking<D>(
    State(state): State<Arc<AppState<D>>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ServerError>
where
    D: DocumentStore + 'static,
{
    let booking = state
        .bookings
        .get(&id)
        .await?
        .ok_or(ServerError::NotFound("Booking"))?;
    if booking.customer_email != identity.email {
        return Err(ServerError::Forbidden);
    }

    state.bookings.delete(&id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
