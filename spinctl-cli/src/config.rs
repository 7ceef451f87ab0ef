//! Configuration module
//!
//! Settings shared by every command: where Gate lives, how to authenticate
//! and how long to wait. Built once from the parsed command line and passed
//! to the command handlers.

use std::fmt;
use std::time::Duration;

/// CLI configuration
#[derive(Clone)]
pub struct Config {
    /// Base URL of the Gate API
    pub gate_url: String,

    /// Token forwarded verbatim in the `authorization` header
    pub token: String,

    /// Overall deadline for the command, if any
    pub timeout: Option<Duration>,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.gate_url.is_empty() {
            anyhow::bail!("gate URL cannot be empty");
        }

        if !self.gate_url.starts_with("http://") && !self.gate_url.starts_with("https://") {
            anyhow::bail!("gate URL must start with http:// or https://");
        }

        if self.token.is_empty() {
            anyhow::bail!("token cannot be empty");
        }

        if self.timeout.is_some_and(|timeout| timeout.is_zero()) {
            anyhow::bail!("timeout must be greater than 0");
        }

        Ok(())
    }
}

// Keeps the token out of logs and panic messages
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("gate_url", &self.gate_url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
