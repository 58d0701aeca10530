//! Registration, login and logout pages.

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use axum_extra::extract::cookie::SignedCookieJar;
use minijinja::context;
use serde::Deserialize;

use crate::auth::{AuthError, ConflictField};
use crate::error::ServerError;
use crate::middleware::session::{end_session, start_session};
use crate::state::AppState;
use crate::views::{Notice, NoticeQuery};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

async fn register_page(
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, ServerError> {
    state
        .views
        .render("register.html", context! { notice => query.message() })
}

async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, ServerError> {
    let outcome = state
        .auth
        .register(
            state.store.as_ref(),
            &form.email,
            form.username.as_deref(),
            &form.password,
        )
        .await;
    match outcome {
        Ok(_) => Ok(Notice::Registered.redirect("/login")),
        Err(AuthError::Conflict(ConflictField::Email)) => Ok(Notice::EmailTaken.redirect("/register")),
        Err(AuthError::Conflict(ConflictField::Username)) => {
            Ok(Notice::UsernameTaken.redirect("/register"))
        }
        Err(AuthError::InvalidInput(_)) => Ok(Notice::InvalidInput.redirect("/register")),
        Err(e) => Err(e.into()),
    }
}

async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, ServerError> {
    state
        .views
        .render("login.html", context! { notice => query.message() })
}

async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, ServerError> {
    match state
        .auth
        .login(state.store.as_ref(), &form.email, &form.password)
        .await
    {
        Ok(user) => Ok((start_session(jar, user.id), Redirect::to("/chat")).into_response()),
        Err(AuthError::InvalidCredentials) => {
            Ok(Notice::InvalidCredentials.redirect("/login").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

async fn logout(jar: SignedCookieJar) -> impl IntoResponse {
    (end_session(jar), Notice::LoggedOut.redirect("/login"))
}
