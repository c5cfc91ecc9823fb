//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "DEN_LOG";

/// Initialize the den tracing/logging system.
///
/// Reads `DEN_LOG` for per-crate log levels, e.g.
/// `DEN_LOG=den_index=debug,den_storage=warn`.
/// Falls back to `den=info` if `DEN_LOG` is unset or invalid.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("den=info"));

        // Logs go to stderr so stdout stays free for path listings.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init_tracing();
        init_tracing();
        ::tracing::info!(target: "den_core", "subscriber installed");
        assert!(INIT.is_completed());
    }
}
