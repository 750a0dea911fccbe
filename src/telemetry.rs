//! Opt-in `tracing` setup for hosts embedding the timeline.
//!
//! The engine only emits spans and events; installing a subscriber is left to
//! the host unless the `telemetry` feature is enabled.

/// Filter used when `RUST_LOG` is unset: engine transitions at `debug`.
pub const DEFAULT_TRACING_FILTER: &str = "timeline_rs=debug";

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `fallback_filter`.
///
/// Returns `false` when the feature is disabled, the fallback does not parse,
/// or the host already installed a global subscriber.
#[must_use]
pub fn init_tracing(fallback_filter: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => match EnvFilter::try_new(fallback_filter) {
                Ok(filter) => filter,
                Err(_) => return false,
            },
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_filter;
        false
    }
}

/// [`init_tracing`] with [`DEFAULT_TRACING_FILTER`].
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_TRACING_FILTER)
}
