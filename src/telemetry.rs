//! Opt-in log output for the layout and render pipeline.
//!
//! The crate only emits `tracing` events (dataset rebuilds, layout stages,
//! skipped passes, config substitutions). Nothing is printed unless the host
//! installs a subscriber, either its own or the one below.

/// Filter used when `RUST_LOG` is unset or unparsable.
#[cfg(feature = "telemetry")]
const FALLBACK_FILTER: &str = "visualisr=info";

/// Installs a compact fmt subscriber filtered by `RUST_LOG`.
///
/// Returns `false` without the `telemetry` feature, or when the host already
/// set a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
