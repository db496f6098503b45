//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Bare registry; tests install their own capture layer
    Test,
}

impl Profile {
    /// Default filter directive used when `RUST_LOG` is not set
    pub fn default_directive(&self) -> &'static str {
        match self {
            Profile::Development => "cmdagg=debug",
            Profile::Production => "cmdagg=info",
            Profile::Test => "off",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Call once at application startup. Later calls are ignored, whatever
/// profile they pass. `RUST_LOG` takes precedence over the profile's
/// default directive.
///
/// # Example
///
/// ```
/// use cmdagg_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.default_directive()));
        match profile {
            Profile::Development => {
                tracing_subscriber::fmt().with_env_filter(filter).init();
            }
            Profile::Production => {
                tracing_subscriber::fmt().json().with_env_filter(filter).init();
            }
            Profile::Test => {
                // capture is installed separately via init_test_capture()
                tracing_subscriber::registry().init();
            }
        }
    });
}
