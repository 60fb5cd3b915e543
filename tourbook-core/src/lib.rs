//! Tourbook Core Library
//!
//! Domain rules shared by the tourbook backend:
//! - Access tokens bind an email to a short-lived signed credential
//! - Roles gate admin and guide operations
//! - Bookings move from `In Review` to `Accepted` or `Rejected`

pub mod booking;
pub mod error;
pub mod role;
pub mod token;

pub use booking::{BookingStatus, GuideRef};
pub use error::Error;
pub use role::Role;
pub use token::{Claims, TokenService};

/// Result type for tourbook-core operations
pub type Result<T> = std::result::Result<T, Error>;
