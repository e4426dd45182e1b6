//! Log output for the `paspale` binary and embedding applications.
//!
//! Plotters emit `tracing` events: draw summaries at `debug`, saved paths and
//! unaligned dual-axis fallbacks at `info`, dropped secondary rows and skipped
//! density curves at `warn`. Nothing is printed unless a subscriber exists.

/// Level used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Installs a compact stderr subscriber filtered by `RUST_LOG`.
///
/// The CLI calls this at startup so figure output on stdout stays clean.
/// Returns `false` without the `telemetry` feature, or when the host already
/// set a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
