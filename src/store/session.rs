//! The signed-in user.
//!
//! `is_authenticated` is derived from the stored user, so the two can never
//! disagree. Nothing here persists: the session cookie held by the
//! transport is the durable part, and [`SessionStore::fetch_current_user`]
//! rebuilds local state from it at startup.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

use super::Loading;
use crate::{
    Result,
    net::ApiClient,
    types::{ApiResponse, User},
};

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct Registration<'a> {
    email: &'a str,
    password: &'a str,
    display_name: &'a str,
}

#[derive(Deserialize)]
struct AuthPayload {
    user: User,
}

pub struct SessionStore {
    api: ApiClient,
    user: Mutex<Option<User>>,
    loading: AtomicBool,
}

impl SessionStore {
    /// Creates a signed-out session.
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            user: Mutex::new(None),
            loading: AtomicBool::new(false),
        }
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<User> {
        self.user.lock().clone()
    }

    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.user.lock().is_some()
    }

    /// Whether a user fetch is running.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Loads the user behind the current session cookie.
    ///
    /// Any failure, including the backend's 401 for "not signed in", leaves
    /// the store signed out. Nothing is returned to the caller.
    pub async fn fetch_current_user(&self) {
        let _loading = Loading::start(&self.loading);

        let user = match self.api.get::<ApiResponse<User>>("/me", &[]).await {
            Ok(response) => Some(response.data),
            Err(e) if e.is_unauthorized() => {
                debug!("no active session");
                None
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch current user");
                None
            }
        };
        *self.user.lock() = user;
    }

    /// Signs in and returns the user.
    ///
    /// # Errors
    ///
    /// Transport and API errors are returned unchanged; the store is not
    /// modified on failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let _loading = Loading::start(&self.loading);

        let response: ApiResponse<AuthPayload> = self
            .api
            .post("/auth/login", &Credentials { email, password })
            .await?;

        Ok(self.sign_in(response.data.user))
    }

    /// Creates an account, signs in, and returns the new user.
    ///
    /// # Errors
    ///
    /// Transport and API errors (e.g. `EMAIL_EXISTS`) are returned
    /// unchanged; the store is not modified on failure.
    pub async fn register(&self, email: &str, password: &str, display_name: &str) -> Result<User> {
        let _loading = Loading::start(&self.loading);

        let body = Registration {
            email,
            password,
            display_name,
        };
        let response: ApiResponse<AuthPayload> = self.api.post("/auth/register", &body).await?;

        Ok(self.sign_in(response.data.user))
    }

    /// Signs out locally, telling the backend on a best-effort basis.
    ///
    /// The local user is cleared whether or not the backend call succeeds.
    pub async fn logout(&self) {
        let _loading = Loading::start(&self.loading);

        if let Err(e) = self.api.post_empty::<Value>("/auth/logout").await {
            warn!(error = %e, "logout request failed, clearing session locally");
        }
        *self.user.lock() = None;
    }

    fn sign_in(&self, user: User) -> User {
        *self.user.lock() = Some(user.clone());
        user
    }
}
