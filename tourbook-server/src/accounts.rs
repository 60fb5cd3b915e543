//! Users and the role lifecycle
//!
//! A user is created on first sign-in without a role. They may ask for
//! `guide` or `admin`, which records a [`RoleRequest`] and flags the user;
//! an admin then grants the role, which also clears the flag.
//!
//! Recording a request and flagging the user are two separate writes with
//! no transaction between them. A failure after the first leaves a request
//! on file for an unflagged user.
//!
//! User creation is likewise find-then-insert. Two first sign-ins racing on
//! the same email can both insert; lookups by email then return the earliest
//! record.

use chrono::Utc;
use serde_json::{Map, Value};
use tourbook_core::Role;

use crate::error::ServerError;
use crate::store::{
    Collection, DocumentStore, Filter, RoleRequest, StoreHandle, StoreResult, Update,
    UpdateResult, User,
};

/// Outcome of an idempotent user creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateUserOutcome {
    Created(String),
    AlreadyExists,
}

/// User and role operations over the document store
pub struct Accounts<D> {
    store: StoreHandle<D>,
}

impl<D: DocumentStore + 'static> Accounts<D> {
    pub fn new(store: StoreHandle<D>) -> Self {
        Self { store }
    }

    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.store
            .find_one(Collection::Users, Filter::eq("email", email))
            .await
    }

    pub async fn list_users(&self) -> StoreResult<Vec<User>> {
        self.store.find(Collection::Users, Filter::all()).await
    }

    /// Insert a user unless one with the same email already exists.
    ///
    /// Roles are never taken from the client: a new user always starts
    /// unset and without a pending request.
    pub async fn create_user(&self, mut user: User) -> StoreResult<CreateUserOutcome> {
        if user.email.trim().is_empty() {
            return Err(ServerError::Validation("email is required".to_string()));
        }
        if self.find_by_email(&user.email).await?.is_some() {
            tracing::debug!(email = %user.email, "User already exists");
            return Ok(CreateUserOutcome::AlreadyExists);
        }

        user.id = None;
        user.role = Role::Unset;
        user.requested_role = false;

        let id = self.store.insert_one(Collection::Users, &user).await?;
        tracing::info!(email = %user.email, user_id = %id, "Created user");
        Ok(CreateUserOutcome::Created(id))
    }

    /// Whether the user with this email holds `role`. Unknown users hold none.
    pub async fn check_role(&self, email: &str, role: Role) -> StoreResult<bool> {
        Ok(self
            .find_by_email(email)
            .await?
            .is_some_and(|user| user.role == role))
    }

    /// Record a request for elevation and flag the user as waiting
    pub async fn request_role(
        &self,
        email: &str,
        desired: Role,
        reason: Option<String>,
        details: Map<String, Value>,
    ) -> StoreResult<String> {
        if !desired.is_requestable() {
            return Err(tourbook_core::Error::RoleNotRequestable(desired.to_string()).into());
        }
        if self.find_by_email(email).await?.is_none() {
            return Err(ServerError::NotFound("User"));
        }

        let request = RoleRequest {
            id: None,
            email: email.to_string(),
            role: desired,
            reason,
            created_at: Utc::now(),
            details,
        };
        let request_id = self
            .store
            .insert_one(Collection::RoleRequests, &request)
            .await?;

        let flagged = self
            .store
            .update_one(
                Collection::Users,
                Filter::eq("email", email),
                Update::set("requestedRole", true),
            )
            .await
            .inspect_err(|e| {
                tracing::error!(
                    email,
                    request_id = %request_id,
                    error = %e,
                    "Role request recorded but user was not flagged"
                )
            })?;
        if flagged.matched_count == 0 {
            tracing::warn!(email, request_id = %request_id, "User vanished before flagging role request");
        }

        tracing::info!(email, role = %desired, request_id = %request_id, "Role requested");
        Ok(request_id)
    }

    /// Users waiting on a role decision
    pub async fn list_pending(&self) -> StoreResult<Vec<User>> {
        self.store
            .find(Collection::Users, Filter::eq("requestedRole", true))
            .await
    }

    /// Role requests on file for a user, oldest first
    pub async fn requests_for(&self, email: &str) -> StoreResult<Vec<RoleRequest>> {
        self.store
            .find(Collection::RoleRequests, Filter::eq("email", email))
            .await
    }

    /// Set a user's role and clear any pending request flag
    pub async fn grant_role(&self, user_id: &str, role: Role) -> StoreResult<UpdateResult> {
        let result = self
            .store
            .update_one(
                Collection::Users,
                Filter::by_id(user_id),
                Update::set("role", role.as_str()).and_set("requestedRole", false),
            )
            .await?;

        if result.matched_count == 0 {
            return Err(ServerError::NotFound("User"));
        }
        tracing::info!(user_id, role = %role, "Granted role");
        Ok(result)
    }
}
