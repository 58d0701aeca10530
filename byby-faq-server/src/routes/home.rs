//! The chat widget page.

use std::sync::Arc;

use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}

/// Self-contained HTML page; its script posts to `/chat`.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn page_posts_to_chat_endpoint() {
        let Html(page) = index().await;
        assert!(page.contains("ByBy PC AI"));
        assert!(page.contains("fetch('/chat'"));
    }
}
