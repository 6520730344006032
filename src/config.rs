//! Listener configuration.
//!
//! # Responsibilities
//! - Define the listener configuration structure
//! - Select the error-detail mode (production vs development)
//! - Probe the process environment for an explicit mode selection
//!
//! # Design Decisions
//! - Mode is injected at construction; the request path never reads
//!   ambient process state
//! - Production is the default; development must be selected explicitly

use serde::{Deserialize, Serialize};

/// Environment variable consulted by [`Mode::from_env`].
pub const MODE_ENV_VAR: &str = "APP_ENV";

/// Error-detail mode for failure responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Opaque 500 responses with no diagnostic detail.
    #[default]
    Production,

    /// 500 responses carrying the error message and cause chain as JSON.
    ///
    /// Exposes internal error detail to callers. Intended for local
    /// debugging only.
    Development,
}

impl Mode {
    /// Resolve the mode from the process environment.
    ///
    /// Returns [`Mode::Development`] only for the explicit values
    /// `development` or `dev`; anything else, including an unset variable,
    /// resolves to [`Mode::Production`].
    pub fn from_env() -> Self {
        match std::env::var(MODE_ENV_VAR).as_deref() {
            Ok("development") | Ok("dev") => Mode::Development,
            _ => Mode::Production,
        }
    }

    /// Returns true when failure responses must stay opaque.
    pub fn is_production(&self) -> bool {
        matches!(self, Mode::Production)
    }
}

/// Configuration for a [`RequestListener`](crate::RequestListener).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ListenerConfig {
    /// Error-detail mode for failure responses.
    pub mode: Mode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_production() {
        assert_eq!(ListenerConfig::default().mode, Mode::Production);
        assert!(Mode::default().is_production());
    }

    #[test]
    fn test_mode_deserializes_lowercase() {
        let mode: Mode = serde_json::from_str("\"development\"").unwrap();
        assert_eq!(mode, Mode::Development);

        let mode: Mode = serde_json::from_str("\"production\"").unwrap();
        assert_eq!(mode, Mode::Production);
    }

    #[test]
    fn test_from_env_requires_explicit_signal() {
        std::env::remove_var(MODE_ENV_VAR);
        assert_eq!(Mode::from_env(), Mode::Production);

        std::env::set_var(MODE_ENV_VAR, "staging");
        assert_eq!(Mode::from_env(), Mode::Production);

        std::env::set_var(MODE_ENV_VAR, "development");
        assert_eq!(Mode::from_env(), Mode::Development);

        std::env::remove_var(MODE_ENV_VAR);
    }
}
