//! Defaults for callback navigation.

use std::time::Duration;

use super::query::ERROR;

/// Configuration for [`CallbackNavigator`](super::CallbackNavigator).
#[derive(Debug, Clone)]
pub struct NavigationConfig {
    /// How long to leave an error on screen before redirecting (ms).
    pub error_redirect_delay_ms: u64,

    /// How long a host should wait before applying a deferred cleanup (ms).
    /// Long enough for the router to finish its own post-navigation work.
    pub cleanup_delay_ms: u64,

    /// Where to go when there is neither a callback nor history.
    pub fallback_path: String,

    /// Query pair added to the return URL after a failed operation.
    pub error_marker: (String, String),
}

impl NavigationConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        error_redirect_delay_ms: u64,
        cleanup_delay_ms: u64,
        fallback_path: impl Into<String>,
    ) -> Self {
        Self {
            error_redirect_delay_ms,
            cleanup_delay_ms,
            fallback_path: fallback_path.into(),
            ..Self::default()
        }
    }

    /// Returns the error redirect delay as a Duration.
    pub fn error_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.error_redirect_delay_ms)
    }

    /// Returns the cleanup delay as a Duration.
    pub fn cleanup_delay(&self) -> Duration {
        Duration::from_millis(self.cleanup_delay_ms)
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            error_redirect_delay_ms: 3000,
            cleanup_delay_ms: 100,
            fallback_path: "/".to_owned(),
            error_marker: (ERROR.to_owned(), "operation_failed".to_owned()),
        }
    }
}
