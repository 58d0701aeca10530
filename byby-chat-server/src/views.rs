//! HTML rendering.
//!
//! Templates are compiled into the binary and rendered with minijinja, which
//! auto-escapes `.html` templates. One-shot messages travel as a `?notice=`
//! query parameter on the redirect target.

use std::str::FromStr;

use axum::response::{Html, Redirect};
use minijinja::{Environment, Value};
use serde::Deserialize;
use strum::{AsRefStr, EnumString};

use crate::error::ServerError;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("register.html", include_str!("../templates/register.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("chat.html", include_str!("../templates/chat.html")),
    ("history.html", include_str!("../templates/history.html")),
    ("admin.html", include_str!("../templates/admin.html")),
    ("404.html", include_str!("../templates/404.html")),
];

#[derive(Debug)]
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render(&self, name: &str, ctx: Value) -> Result<Html<String>, ServerError> {
        Ok(Html(self.env.get_template(name)?.render(ctx)?))
    }
}

/// Messages shown once after a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Notice {
    Registered,
    EmailTaken,
    UsernameTaken,
    InvalidInput,
    InvalidCredentials,
    LoginRequired,
    LoggedOut,
    AdminOnly,
    EmptyMessage,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::Registered => "Registration successful. Please log in.",
            Notice::EmailTaken => "That email is already registered.",
            Notice::UsernameTaken => "That username is already taken.",
            Notice::InvalidInput => "Please enter a valid email address and a password.",
            Notice::InvalidCredentials => "Invalid email or password.",
            Notice::LoginRequired => "Please log in first.",
            Notice::LoggedOut => "You have been logged out.",
            Notice::AdminOnly => "Only the administrator can open that page.",
            Notice::EmptyMessage => "Please type a question.",
        }
    }

    /// Redirect to `path` carrying this notice.
    pub fn redirect(self, path: &str) -> Redirect {
        Redirect::to(&format!("{path}?notice={}", self.as_ref()))
    }
}

/// Query string of pages that can show a notice. Unknown codes are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    #[serde(default)]
    pub notice: Option<String>,
}

impl NoticeQuery {
    pub fn message(&self) -> Option<&'static str> {
        self.notice
            .as_deref()
            .and_then(|code| Notice::from_str(code).ok())
            .map(Notice::message)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::response::IntoResponse;
    use minijinja::context;

    #[test]
    fn every_template_compiles() {
        let views = Views::new().expect("templates");
        for (name, _) in TEMPLATES {
            assert!(views.env.get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn notice_codes_round_trip_through_query() {
        let query = NoticeQuery {
            notice: Some(Notice::EmailTaken.as_ref().to_owned()),
        };
        assert_eq!(Notice::EmailTaken.as_ref(), "email-taken");
        assert_eq!(query.message(), Some("That email is already registered."));

        let bogus = NoticeQuery {
            notice: Some("<script>".into()),
        };
        assert_eq!(bogus.message(), None);
    }

    #[test]
    fn redirect_carries_notice() {
        let response = Notice::AdminOnly.redirect("/chat").into_response();
        assert_eq!(response.headers()["location"], "/chat?notice=admin-only");
    }

    #[test]
    fn user_text_is_escaped() {
        let views = Views::new().expect("templates");
        let Html(page) = views
            .render(
                "chat.html",
                context! { question => "<b>hi</b>", answer => "<script>x</script>" },
            )
            .expect("render");
        assert!(page.contains("&lt;b&gt;hi"));
        assert!(!page.contains("<script>x</script>"));
    }
}
