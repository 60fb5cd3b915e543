//! Booking lifecycle

use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};
use tourbook_core::{BookingStatus, GuideRef};

use crate::error::ServerError;
use crate::store::{Booking, Collection, DocumentStore, Filter, StoreHandle, StoreResult, Update};

/// Booking fields accepted from a client
///
/// Any `status` the client sends lands in `details` and is discarded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    /// Composite `"name, email"` reference to the guide
    pub tour_guide: String,
    #[serde(default)]
    pub package_id: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Reserved fields the server always computes itself
const SERVER_FIELDS: &[&str] = &[
    "_id",
    "status",
    "customerEmail",
    "guideName",
    "guideEmail",
    "createdAt",
];

/// Booking operations over the document store
pub struct Bookings<D> {
    store: StoreHandle<D>,
}

impl<D: DocumentStore + 'static> Bookings<D> {
    pub fn new(store: StoreHandle<D>) -> Self {
        Self { store }
    }

    /// Store a new booking for `customer_email`, always `In Review`
    pub async fn create(&self, customer_email: &str, new: NewBooking) -> StoreResult<Booking> {
        let guide: GuideRef = new.tour_guide.parse()?;

        let mut details = new.details;
        for field in SERVER_FIELDS {
            details.remove(*field);
        }

        let mut booking = Booking {
            id: None,
            customer_email: customer_email.to_string(),
            tour_guide: guide.to_string(),
            guide_name: guide.name,
            guide_email: guide.email,
            package_id: new.package_id,
            status: BookingStatus::InReview,
            created_at: Utc::now(),
            details,
        };

        let id = self.store.insert_one(Collection::Bookings, &booking).await?;
        tracing::info!(
            booking_id = %id,
            customer = %booking.customer_email,
            guide = %booking.guide_email,
            "Booking created"
        );
        booking.id = Some(id);
        Ok(booking)
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<Booking>> {
        self.store
            .find_one(Collection::Bookings, Filter::by_id(id))
            .await
    }

    /// Move a booking to a terminal status
    pub async fn update_status(&self, id: &str, to: BookingStatus) -> StoreResult<Booking> {
        let mut booking = self.get(id).await?.ok_or(ServerError::NotFound("Booking"))?;
        let next = booking.status.transition(to)?;

        let result = self
            .store
            .update_one(
                Collection::Bookings,
                Filter::by_id(id),
                Update::set("status", next.as_str()),
            )
            .await?;
        if result.matched_count == 0 {
            return Err(ServerError::NotFound("Booking"));
        }

        tracing::info!(booking_id = id, from = %booking.status, to = %next, "Booking status updated");
        booking.status = next;
        Ok(booking)
    }

    pub async fn find_by_customer(&self, email: &str) -> StoreResult<Vec<Booking>> {
        self.store
            .find(Collection::Bookings, Filter::eq("customerEmail", email))
            .await
    }

    pub async fn find_by_guide_email(&self, email: &str) -> StoreResult<Vec<Booking>> {
        self.store
            .find(Collection::Bookings, Filter::eq("guideEmail", email))
            .await
    }

    /// Remove a booking, reporting a missing id as not found
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let deleted = self
            .store
            .delete_one(Collection::Bookings, Filter::by_id(id))
            .await?;
        if deleted == 0 {
            return Err(ServerError::NotFound("Booking"));
        }
        tracing::info!(booking_id = id, "Booking deleted");
        Ok(())
    }
}
