//! Environment-variable helpers used by every `Config::from_env`.

/// Value of `key`, or `default` when unset or not valid UTF-8.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Value of `key` when set to something other than whitespace.
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Parse `key` into `T`, falling back to `default` when unset or unparsable.
pub fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// `true` when `key` is `1` or `true` (case-insensitive).
pub fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| {
            let v = v.trim();
            v == "1" || v.eq_ignore_ascii_case("true")
        })
        .unwrap_or(false)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    // Every test owns a distinct variable name so they can run in parallel.

    #[test]
    fn env_or_falls_back_when_unset() {
        assert_eq!(env_or("BYBY_TEST_ENV_OR_UNSET", "fallback"), "fallback");
    }

    #[test]
    fn env_opt_ignores_blank_values() {
        unsafe { std::env::set_var("BYBY_TEST_ENV_OPT_BLANK", "   ") };
        assert_eq!(env_opt("BYBY_TEST_ENV_OPT_BLANK"), None);

        unsafe { std::env::set_var("BYBY_TEST_ENV_OPT_SET", " secret ") };
        assert_eq!(env_opt("BYBY_TEST_ENV_OPT_SET").as_deref(), Some("secret"));
    }

    #[test]
    fn parse_env_uses_default_on_garbage() {
        unsafe { std::env::set_var("BYBY_TEST_PARSE_GARBAGE", "many") };
        assert_eq!(parse_env("BYBY_TEST_PARSE_GARBAGE", 5u32), 5);

        unsafe { std::env::set_var("BYBY_TEST_PARSE_OK", "12") };
        assert_eq!(parse_env("BYBY_TEST_PARSE_OK", 5u32), 12);
    }

    #[test]
    fn env_flag_accepts_one_and_true() {
        unsafe { std::env::set_var("BYBY_TEST_FLAG_ONE", "1") };
        unsafe { std::env::set_var("BYBY_TEST_FLAG_TRUE", "TRUE") };
        unsafe { std::env::set_var("BYBY_TEST_FLAG_NO", "yes") };
        assert!(env_flag("BYBY_TEST_FLAG_ONE"));
        assert!(env_flag("BYBY_TEST_FLAG_TRUE"));
        assert!(!env_flag("BYBY_TEST_FLAG_NO"));
        assert!(!env_flag("BYBY_TEST_FLAG_UNSET"));
    }
}
