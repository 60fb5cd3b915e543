//! HTTP routes for the server

mod bookings;
mod catalog;
mod requests;
mod stories;
mod token;
mod users;
mod wishlist;

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::guard;
use crate::state::AppState;
use crate::store::DocumentStore;

/// Body returned by insert endpoints
///
/// `insertedId` is null, with a message, when nothing was inserted because
/// the record already existed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResponse {
    pub inserted_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl InsertResponse {
    pub fn inserted(id: String) -> Self {
        Self {
            inserted_id: Some(id),
            message: None,
        }
    }

    pub fn existing(message: &str) -> Self {
        Self {
            inserted_id: None,
            message: Some(message.to_string()),
        }
    }
}

/// Create the router with all routes
pub fn create_router<D>(state: Arc<AppState<D>>) -> Router
where
    D: DocumentStore + 'static,
{
    let auth = || from_fn_with_state(state.clone(), guard::authenticate::<D>);
    let admin = || from_fn_with_state(state.clone(), guard::require_admin::<D>);
    let guide = || from_fn_with_state(state.clone(), guard::require_guide::<D>);

    Router::new()
        .route("/", get(root))
        .route("/jwt", post(token::issue_token::<D>))
        // Users and roles. `:user` is an email for role checks and an id for grants.
        .route(
            "/users",
            post(users::create_user::<D>)
                .merge(get(users::list_users::<D>).route_layer(admin()).route_layer(auth())),
        )
        .route(
            "/users/admin/:user",
            get(users::check_admin::<D>)
                .route_layer(auth())
                .merge(patch(users::make_admin::<D>).route_layer(admin()).route_layer(auth())),
        )
        .route(
            "/users/guide/:user",
            get(users::check_guide::<D>)
                .route_layer(auth())
                .merge(patch(users::make_guide::<D>).route_layer(admin()).route_layer(auth())),
        )
        .route(
            "/request",
            post(requests::request_role::<D>)
                .route_layer(auth())
                .merge(get(requests::list_pending::<D>).route_layer(admin()).route_layer(auth())),
        )
        // Bookings
        .route("/bookings", post(bookings::create_booking::<D>).route_layer(auth()))
        .route(
            "/bookings/customer/:email",
            get(bookings::list_for_customer::<D>).route_layer(auth()),
        )
        .route(
            "/bookings/tour-guide/:email",
            get(bookings::list_for_guide::<D>).route_layer(auth()),
        )
        .route(
            "/bookings/:id/status",
            patch(bookings::update_status::<D>)
                .route_layer(guide())
                .route_layer(auth()),
        )
        .route("/bookings/:id", delete(bookings::delete_booking::<D>).route_layer(auth()))
        // Catalog
        .route(
            "/packages",
            get(catalog::list_packages::<D>)
                .merge(post(catalog::create_package::<D>).route_layer(admin()).route_layer(auth())),
        )
        .route("/packages/:id", get(catalog::get_package::<D>))
        .route(
            "/packages/tour-type/:tour_type",
            get(catalog::packages_by_tour_type::<D>),
        )
        .route("/tourType", get(catalog::list_tour_types::<D>))
        .route("/tourGuides", get(catalog::list_guides::<D>))
        .route("/tourGuides/:id", get(catalog::get_guide::<D>))
        // Wishlists and stories
        .route("/wishlist", post(wishlist::add_item::<D>).route_layer(auth()))
        // `:key` is the owner's email for listing and an item id for removal
        .route(
            "/wishlist/:key",
            get(wishlist::list_items::<D>)
                .merge(delete(wishlist::remove_item::<D>))
                .route_layer(auth()),
        )
        .route(
            "/stories",
            get(stories::list_stories::<D>)
                .merge(post(stories::create_story::<D>).route_layer(auth())),
        )
        .route("/stories/:id", get(stories::get_story::<D>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> &'static str {
    "Welcome to Tourbook"
}
