//! Typed records for each collection
//!
//! Fields the server reasons about are typed; everything else a client
//! sends (display names, prices, trip dates, images) rides along in the
//! flattened `details` map untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tourbook_core::{BookingStatus, Role};

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Role::is_unset")]
    pub role: Role,
    #[serde(default)]
    pub requested_role: bool,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// A user's ask to be elevated to a role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequest {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// A reservation of a package with a guide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub customer_email: String,
    /// Composite `"name, email"` kept for older clients
    pub tour_guide: String,
    pub guide_name: String,
    pub guide_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// A tour package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub tour_type: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// A tour category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourType {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// A tour guide's public profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourGuide {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// A package a user saved for later
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    pub package_id: String,
    pub added_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// A traveller's story
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub author_email: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_defaults_and_extra_fields() {
        let user: User = serde_json::from_value(json!({
            "email": "a@x.com",
            "name": "A",
            "photoURL": "https://img"
        }))
        .unwrap();

        assert_eq!(user.role, Role::Unset);
        assert!(!user.requested_role);
        assert_eq!(user.details["photoURL"], "https://img");

        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("role").is_none());
        assert!(value.get("_id").is_none());
        assert_eq!(value["requestedRole"], false);
    }

    #[test]
    fn test_booking_wire_names() {
        let booking: Booking = serde_json::from_value(json!({
            "_id": "b1",
            "customerEmail": "c@x.com",
            "tourGuide": "G, g@x.com",
            "guideName": "G",
            "guideEmail": "g@x.com",
            "status": "In Review",
            "createdAt": "2024-05-01T10:00:00Z",
            "price": 120
        }))
        .unwrap();

        assert_eq!(booking.id.as_deref(), Some("b1"));
        assert_eq!(booking.status, BookingStatus::InReview);
        assert_eq!(booking.details["price"], 120);
    }
}
