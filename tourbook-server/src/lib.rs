//! Tourbook Server
//!
//! HTTP backend for a tour-booking site: packages, tour guides, bookings,
//! wishlists, stories, and the role requests that turn users into guides
//! or admins. Protected routes take a bearer token issued by `POST /jwt`.

pub mod accounts;
pub mod bookings;
pub mod config;
pub mod error;
pub mod guard;
pub mod routes;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::ServerError;
pub use guard::Identity;
pub use state::AppState;
pub use store::{DocumentStore, InMemoryStore, SqliteStore, StoreHandle};
