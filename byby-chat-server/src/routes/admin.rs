//! Administrator overview of all users and all chat rows.

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Extension, Router};
use axum_extra::extract::cookie::SignedCookieJar;
use minijinja::context;
use tracing::warn;

use crate::entities::{ChatStore, UserStore};
use crate::error::ServerError;
use crate::middleware::session::{end_session, SessionUser};
use crate::state::AppState;
use crate::views::Notice;

pub fn router() -> Router<AppState> {
    Router::new().route("/admin", get(admin))
}

/// Only the user named `config.admin_username` sees the lists; everyone else
/// is sent back to the chat page before anything is queried.
async fn admin(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    jar: SignedCookieJar,
) -> Result<Response, ServerError> {
    let Some(user) = state.store.get_user(session.user_id).await? else {
        warn!(user_id = session.user_id, "session for a missing user");
        return Ok((end_session(jar), Redirect::to("/login")).into_response());
    };
    if user.username != state.config.admin_username {
        warn!(user_id = user.id, "non-admin denied /admin");
        return Ok(Notice::AdminOnly.redirect("/chat").into_response());
    }

    let users = state.store.list_users().await?;
    let chats = state.store.list_all_chats().await?;
    let page = state
        .views
        .render("admin.html", context! { users => users, chats => chats })?;
    Ok(page.into_response())
}
