//! Chat page and per-user history.

use axum::extract::{Query, State};
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::{Extension, Form, Router};
use minijinja::context;
use serde::Deserialize;
use tracing::debug;

use crate::entities::ChatStore;
use crate::error::ServerError;
use crate::middleware::session::SessionUser;
use crate::state::AppState;
use crate::views::{Notice, NoticeQuery};

pub fn public_router() -> Router<AppState> {
    Router::new().route("/", get(|| async { Redirect::to("/chat") }))
}

/// Routes that expect a [`SessionUser`] extension.
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/chat", get(chat_page).post(ask))
        .route("/chat-history", get(history))
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

async fn chat_page(
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, ServerError> {
    state
        .views
        .render("chat.html", context! { notice => query.message() })
}

async fn ask(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    Form(form): Form<ChatForm>,
) -> Result<Html<String>, ServerError> {
    let question = form.message.trim();
    if question.is_empty() {
        debug!(user_id = session.user_id, "blank chat message ignored");
        return state.views.render(
            "chat.html",
            context! { notice => Notice::EmptyMessage.message() },
        );
    }

    let resolution = state
        .resolver
        .resolve(state.store.as_ref(), session.user_id, question)
        .await?;
    state.views.render(
        "chat.html",
        context! {
            question => question,
            answer => resolution.answer,
            source => resolution.source.as_ref(),
        },
    )
}

async fn history(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
) -> Result<Html<String>, ServerError> {
    let chats = state.store.list_chats_for_user(session.user_id).await?;
    state.views.render("history.html", context! { chats => chats })
}

#[cfg(test)]
mod test {
    use std::sync::atomic::Ordering;

    use axum::http::StatusCode;

    use crate::entities::{ChatStore, UserStore};
    use crate::resolver::test::{FixedQa, FixedSearch};
    use crate::routes::build;
    use crate::routes::testing::{get, post_form, send, sign_in};
    use crate::state::testing::{state_with, test_state};

    async fn user_id(state: &crate::state::AppState, email: &str) -> i64 {
        state
            .store
            .find_user_by_email(email)
            .await
            .expect("lookup")
            .expect("user")
            .id
    }

    #[tokio::test]
    async fn root_redirects_to_chat() {
        let app = build(test_state().await);
        let page = send(&app, get("/", None)).await;
        assert_eq!(page.location.as_deref(), Some("/chat"));
    }

    #[tokio::test]
    async fn each_post_logs_exactly_one_row() {
        let state = test_state().await;
        let app = build(state.clone());
        let cookie = sign_in(&app, "an@example.com", "an", "pw").await;

        let page = send(
            &app,
            post_form("/chat", "message=How+long+is+the+warranty%3F", Some(&cookie)),
        )
        .await;
        assert_eq!(page.status, StatusCode::OK);
        assert!(page.body.contains("Every ByBy PC computer comes with a two-year hardware warranty."));

        send(&app, post_form("/chat", "message=Who+are+you", Some(&cookie))).await;

        let id = user_id(&state, "an@example.com").await;
        let rows: Vec<String> = state
            .store
            .list_chats_for_user(id)
            .await
            .expect("history")
            .into_iter()
            .map(|c| c.message)
            .collect();
        assert_eq!(
            rows,
            [
                "Q: How long is the warranty? A: Every ByBy PC computer comes with a two-year hardware warranty.",
                "Q: Who are you A: two years",
            ]
        );
    }

    #[tokio::test]
    async fn blank_message_is_not_logged() {
        let state = test_state().await;
        let app = build(state.clone());
        let cookie = sign_in(&app, "an@example.com", "an", "pw").await;

        let page = send(&app, post_form("/chat", "message=+++", Some(&cookie))).await;
        assert_eq!(page.status, StatusCode::OK);
        assert!(page.body.contains("Please type a question."));
        assert!(state.store.list_all_chats().await.expect("chats").is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_is_bad_gateway_and_not_logged() {
        let search = FixedSearch::with(Err(500));
        let state = state_with(FixedQa::answering("[CLS]"), search.clone()).await;
        let app = build(state.clone());
        let cookie = sign_in(&app, "an@example.com", "an", "pw").await;

        let page = send(&app, post_form("/chat", "message=Who+won", Some(&cookie))).await;
        assert_eq!(page.status, StatusCode::BAD_GATEWAY);
        assert_eq!(search.calls.load(Ordering::SeqCst), 1);
        assert!(state.store.list_all_chats().await.expect("chats").is_empty());
    }

    #[tokio::test]
    async fn history_shows_only_own_rows() {
        let state = test_state().await;
        let app = build(state.clone());
        let an = sign_in(&app, "an@example.com", "an", "pw").await;
        let binh = sign_in(&app, "binh@example.com", "binh", "pw").await;

        send(&app, post_form("/chat", "message=question+from+an", Some(&an))).await;
        send(&app, post_form("/chat", "message=question+from+binh", Some(&binh))).await;

        let page = send(&app, get("/chat-history", Some(&an))).await;
        assert_eq!(page.status, StatusCode::OK);
        assert!(page.body.contains("Q: question from an A: two years"));
        assert!(!page.body.contains("question from binh"));
    }
}
