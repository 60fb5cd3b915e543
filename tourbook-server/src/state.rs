//! Shared application state

use tourbook_core::TokenService;

use crate::accounts::Accounts;
use crate::bookings::Bookings;
use crate::store::{DocumentStore, StoreHandle};

/// Server application state
pub struct AppState<D> {
    /// Issues and verifies access tokens
    pub tokens: TokenService,
    /// Raw store access for catalog routes
    pub store: StoreHandle<D>,
    /// Users and role lifecycle
    pub accounts: Accounts<D>,
    /// Booking lifecycle
    pub bookings: Bookings<D>,
}

impl<D: DocumentStore + 'static> AppState<D> {
    pub fn new(tokens: TokenService, store: StoreHandle<D>) -> Self {
        Self {
            tokens,
            accounts: Accounts::new(store.clone()),
            bookings: Bookings::new(store.clone()),
            store,
        }
    }
}
