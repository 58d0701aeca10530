//! Cookie sessions.
//!
//! A session is the user id in a cookie signed with the server key. Routes
//! behind [`require_session`] get a [`SessionUser`] request extension;
//! requests without a valid cookie, or whose user no longer exists, are
//! redirected to the login page.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use thiserror::Error;
use tracing::{debug, warn};

use crate::entities::UserStore;
use crate::error::ServerError;
use crate::state::AppState;
use crate::views::Notice;

pub const SESSION_COOKIE: &str = "byby_session";

/// Shortest accepted `BYBY_SESSION_SECRET`, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
#[error("BYBY_SESSION_SECRET must be at least {MIN_SECRET_LEN} bytes (got {0})")]
pub struct SessionKeyError(usize);

/// Signing key from the configured secret, or a fresh random key.
pub fn session_key(secret: Option<&str>) -> Result<Key, SessionKeyError> {
    match secret {
        Some(secret) if secret.len() < MIN_SECRET_LEN => Err(SessionKeyError(secret.len())),
        Some(secret) => Ok(Key::derive_from(secret.as_bytes())),
        None => Ok(Key::generate()),
    }
}

/// The authenticated user of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: i64,
}

impl SessionUser {
    pub fn from_jar(jar: &SignedCookieJar) -> Option<Self> {
        let cookie = jar.get(SESSION_COOKIE)?;
        cookie
            .value()
            .parse()
            .ok()
            .map(|user_id| SessionUser { user_id })
    }
}

pub fn start_session(jar: SignedCookieJar, user_id: i64) -> SignedCookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, user_id.to_string()))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/"),
    )
}

pub fn end_session(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

pub async fn require_session(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(session) = SessionUser::from_jar(&jar) else {
        debug!(path = %req.uri().path(), "no session, redirecting to login");
        return Notice::LoginRequired.redirect("/login").into_response();
    };
    match state.store.get_user(session.user_id).await {
        Ok(Some(_)) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Ok(None) => {
            warn!(user_id = session.user_id, "session for a missing user");
            (end_session(jar), Notice::LoginRequired.redirect("/login")).into_response()
        }
        Err(e) => ServerError::from(e).into_response(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn short_secret_is_rejected() {
        let err = session_key(Some("too short")).unwrap_err();
        assert!(err.to_string().contains("at least 32 bytes"));
        assert!(session_key(Some(&"k".repeat(MIN_SECRET_LEN))).is_ok());
        assert!(session_key(None).is_ok());
    }

    #[test]
    fn session_cookie_round_trips_through_signed_jar() {
        let key = session_key(Some(&"s".repeat(64))).expect("key");
        let jar = start_session(SignedCookieJar::new(key.clone()), 42);
        assert_eq!(SessionUser::from_jar(&jar), Some(SessionUser { user_id: 42 }));

        let jar = end_session(jar);
        assert_eq!(SessionUser::from_jar(&jar), None);
    }

    #[tokio::test]
    async fn cookie_for_missing_user_ends_the_session() {
        use crate::entities::ChatStore;
        use crate::routes::build;
        use crate::routes::testing::{get, post_form, send};
        use crate::state::testing::test_state;

        let state = test_state().await;
        let app = build(state.clone());
        let signed = start_session(SignedCookieJar::new(state.cookie_key.clone()), 999).into_response();
        let cookie = signed.headers()[axum::http::header::SET_COOKIE]
            .to_str()
            .expect("cookie header")
            .split(';')
            .next()
            .expect("cookie pair")
            .to_owned();

        for request in [
            get("/chat-history", Some(&cookie)),
            post_form("/chat", "message=hello", Some(&cookie)),
        ] {
            let page = send(&app, request).await;
            assert_eq!(page.status, axum::http::StatusCode::SEE_OTHER);
            assert_eq!(page.location.as_deref(), Some("/login?notice=login-required"));
            assert!(page.set_cookie.expect("removal").starts_with("byby_session="));
        }
        assert!(state.store.list_all_chats().await.expect("chats").is_empty());
    }
}
