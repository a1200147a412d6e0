use std::env;
use std::time::Duration;

pub const BASE_URL_ENV: &str = "TOKENGATE_BASE_URL";
pub const USER_ENV: &str = "TOKENGATE_USER";
pub const TIMEOUT_ENV: &str = "TOKENGATE_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:10000/httpDemo";
const DEFAULT_USER: &str = "demo.user";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`crate::TokenClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the token service, without the per-operation path.
    pub base_url: String,
    /// User the session is requested for.
    pub user_name: String,
    /// Per-request timeout applied to the underlying HTTP client.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_name: DEFAULT_USER.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Resolve the configuration from the environment.
    ///
    /// Missing variables keep the defaults; an unparsable timeout logs a
    /// warning and keeps the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = env::var(BASE_URL_ENV) {
            if !value.is_empty() {
                config.base_url = value;
            }
        }

        if let Ok(value) = env::var(USER_ENV) {
            if !value.is_empty() {
                config.user_name = value;
            }
        }

        if let Ok(value) = env::var(TIMEOUT_ENV) {
            match value.parse::<u64>() {
                Ok(secs) => config.request_timeout = Duration::from_secs(secs),
                Err(error) => {
                    tracing::warn!(%value, %error, "invalid timeout override, using default");
                }
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::sync::{Mutex, PoisonError};
    use std::time::Duration;

    use super::{ClientConfig, BASE_URL_ENV, TIMEOUT_ENV, USER_ENV};

    // The environment is process-global; tests touching it take this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_overrides() {
        env::remove_var(BASE_URL_ENV);
        env::remove_var(USER_ENV);
        env::remove_var(TIMEOUT_ENV);
    }

    #[test]
    fn defaults_point_at_the_dev_service() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:10000/httpDemo");
        assert_eq!(config.user_name, "demo.user");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn env_overrides_are_applied() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        env::set_var(BASE_URL_ENV, "http://10.0.0.5:8080/httpDemo");
        env::set_var(USER_ENV, "override.user");
        env::set_var(TIMEOUT_ENV, "3");

        let config = ClientConfig::from_env();
        clear_overrides();

        assert_eq!(config.base_url, "http://10.0.0.5:8080/httpDemo");
        assert_eq!(config.user_name, "override.user");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn empty_overrides_keep_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        env::set_var(BASE_URL_ENV, "");
        env::set_var(USER_ENV, "");

        let config = ClientConfig::from_env();
        clear_overrides();

        assert_eq!(config.base_url, ClientConfig::default().base_url);
        assert_eq!(config.user_name, ClientConfig::default().user_name);
    }

    #[test]
    fn invalid_timeout_falls_back_to_default() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        env::set_var(TIMEOUT_ENV, "not-a-number");

        let config = ClientConfig::from_env();
        clear_overrides();

        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }
}
