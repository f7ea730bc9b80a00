use std::time::Duration;

use bidgate_core::{AppError, AppResult};

const DEFAULT_DIRECTORY_LOOKUP_TIMEOUT: Duration = Duration::from_millis(250);

/// Runtime settings for authorization checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationConfig {
    directory_lookup_timeout: Duration,
}

impl AuthorizationConfig {
    /// Creates a configuration with an explicit per-lookup directory timeout.
    pub fn new(directory_lookup_timeout: Duration) -> AppResult<Self> {
        if directory_lookup_timeout.is_zero() {
            return Err(AppError::Validation(
                "directory lookup timeout must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            directory_lookup_timeout,
        })
    }

    /// Returns how long one organization directory lookup may take before the check denies.
    #[must_use]
    pub fn directory_lookup_timeout(&self) -> Duration {
        self.directory_lookup_timeout
    }
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            directory_lookup_timeout: DEFAULT_DIRECTORY_LOOKUP_TIMEOUT,
        }
    }
}
