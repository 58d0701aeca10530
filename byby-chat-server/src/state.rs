//! Shared application state injected into every Axum handler.

use std::fmt;
use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::auth::AuthService;
use crate::config::Config;
use crate::entities::AnyStore;
use crate::resolver::AnswerResolver;
use crate::views::Views;

/// State shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Users and chat log.
    pub store: Arc<AnyStore>,
    /// Registration and login.
    pub auth: Arc<AuthService>,
    /// FAQ → QA model → search chain.
    pub resolver: Arc<AnswerResolver>,
    pub views: Arc<Views>,
    /// Signs the session cookie.
    pub cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("auth", &self.auth)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}
