use std::time::Duration;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the `/api/v1` tree (default: `http://localhost:3000/api/v1`).
    pub api_url: String,
    /// Per-request timeout (default: 30 seconds).
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000/api/v1".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the environment (and `.env`, if present).
    ///
    /// | Env Var                         | Default                          |
    /// |---------------------------------|----------------------------------|
    /// | `CALLFLOW_API_URL`              | `http://localhost:3000/api/v1`   |
    /// | `CALLFLOW_REQUEST_TIMEOUT_SECS` | `30`                             |
    ///
    /// An unparsable timeout falls back to the default with a warning.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let api_url = std::env::var("CALLFLOW_API_URL").unwrap_or(defaults.api_url);

        let request_timeout = parse_timeout(
            std::env::var("CALLFLOW_REQUEST_TIMEOUT_SECS").ok().as_deref(),
            defaults.request_timeout,
        );

        Self {
            api_url,
            request_timeout,
        }
    }
}

/// Parse a timeout in whole seconds, keeping `default` when unset or invalid.
fn parse_timeout(raw: Option<&str>, default: Duration) -> Duration {
    match raw.map(|r| (r, r.trim().parse::<u64>())) {
        Some((_, Ok(secs))) => Duration::from_secs(secs),
        Some((raw, Err(_))) => {
            tracing::warn!(value = %raw, "Invalid CALLFLOW_REQUEST_TIMEOUT_SECS, using default");
            default
        }
        None => default,
    }
}
