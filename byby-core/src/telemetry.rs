//! Structured logging setup.

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `log_level`; an invalid `log_level` is
/// reported on stderr (the subscriber does not exist yet) and replaced by
/// `info`. When `json` is set, records are emitted as newline-delimited JSON.
pub fn init_tracing(log_level: &str, json: bool) {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match log_level.parse::<EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: BYBY_LOG='{log_level}' is not a valid tracing filter ({e}); \
                     falling back to 'info'"
                );
                EnvFilter::new("info")
            }
        },
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true);

    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
