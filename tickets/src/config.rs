//! Runtime configuration, loaded from environment variables.
//!
//! Every knob has a default so a bare environment still yields a working
//! configuration; values that are present but unparseable are an error
//! rather than a silent fallback.

use anyhow::Context;

/// Backend API settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the platform API
    pub base_url: String,
    /// Per-request timeout, seconds
    pub request_timeout: u64,
    /// Retry budget for transient failures
    pub max_retries: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout: 10,
            max_retries: 3,
        }
    }
}

/// Role view presentation settings.
///
/// The page sizes differ per role because the three pages render tickets
/// at different densities.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Tickets per page on the customer view
    pub customer_page_size: u32,
    /// Tickets per page on the mentor view
    pub mentor_page_size: u32,
    /// Tickets per page on the QAQC view
    pub qaqc_page_size: u32,
    /// Quiet period before a search edit becomes a query, milliseconds
    pub search_debounce_ms: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            customer_page_size: 3,
            mentor_page_size: 4,
            qaqc_page_size: 6,
            search_debounce_ms: 300,
        }
    }
}

/// Full subsystem configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Backend API settings
    pub api: ApiConfig,
    /// Role view settings
    pub view: ViewConfig,
}

fn env_parsed<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().with_context(|| format!("invalid {key}: {raw}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Recognized variables: `COURSEDESK_API_URL`,
    /// `COURSEDESK_API_TIMEOUT_SECS`, `COURSEDESK_API_MAX_RETRIES`,
    /// `COURSEDESK_CUSTOMER_PAGE_SIZE`, `COURSEDESK_MENTOR_PAGE_SIZE`,
    /// `COURSEDESK_QAQC_PAGE_SIZE`, `COURSEDESK_SEARCH_DEBOUNCE_MS`.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set but does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_defaults = ApiConfig::default();
        let view_defaults = ViewConfig::default();

        Ok(Self {
            api: ApiConfig {
                base_url: std::env::var("COURSEDESK_API_URL")
                    .unwrap_or(api_defaults.base_url),
                request_timeout: env_parsed(
                    "COURSEDESK_API_TIMEOUT_SECS",
                    api_defaults.request_timeout,
                )?,
                max_retries: env_parsed(
                    "COURSEDESK_API_MAX_RETRIES",
                    api_defaults.max_retries,
                )?,
            },
            view: ViewConfig {
                customer_page_size: env_parsed(
                    "COURSEDESK_CUSTOMER_PAGE_SIZE",
                    view_defaults.customer_page_size,
                )?,
                mentor_page_size: env_parsed(
                    "COURSEDESK_MENTOR_PAGE_SIZE",
                    view_defaults.mentor_page_size,
                )?,
                qaqc_page_size: env_parsed(
                    "COURSEDESK_QAQC_PAGE_SIZE",
                    view_defaults.qaqc_page_size,
                )?,
                search_debounce_ms: env_parsed(
                    "COURSEDESK_SEARCH_DEBOUNCE_MS",
                    view_defaults.search_debounce_ms,
                )?,
            },
        })
    }
}
