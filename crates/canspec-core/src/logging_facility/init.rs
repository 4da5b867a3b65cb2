//! Logging initialization module

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development and the CLI
    Development,
    /// JSON structured output for services embedding the engine
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl Profile {
    /// Map a CLI `--log-format` value onto a profile
    pub fn from_log_format(format: &str) -> Option<Self> {
        match format.trim().to_ascii_lowercase().as_str() {
            "human" | "text" | "pretty" => Some(Profile::Development),
            "json" => Some(Profile::Production),
            _ => None,
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Only the first call has any effect. `RUST_LOG` overrides the default
/// filter of each profile.
///
/// # Profiles
///
/// - **Development**: Human-readable logs, `canspec=debug`
/// - **Production**: JSON structured logs, `canspec=info`
/// - **Test**: Bare registry; use `init_test_capture()` for assertions
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("canspec=debug")),
                )
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("canspec=info")),
                )
                .init();
        }
        Profile::Test => {
            tracing_subscriber::registry().init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_log_format() {
        assert_eq!(Profile::from_log_format("JSON"), Some(Profile::Production));
        assert_eq!(
            Profile::from_log_format(" human "),
            Some(Profile::Development)
        );
        assert_eq!(Profile::from_log_format("xml"), None);
    }
}
