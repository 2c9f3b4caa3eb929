//! Development helper for structured logging.
//!
//! tcptune logs through `tracing` under the `tcptune_core` target:
//! - `debug!` `[TABLE]` once, when the host option table is built
//! - `trace!` `[SOCKOPT]` for every get/set with the resolved level/name
//! - `warn!` `[TCP]` when an option is skipped on this OS or Windows build

/// Install an `EnvFilter`-driven fmt subscriber when `RUST_LOG` is set.
///
/// Tests and benches call this before touching sockets, e.g. with
/// `RUST_LOG=tcptune_core=trace` to watch each option call. Does nothing when
/// `RUST_LOG` is unset or a global subscriber is already installed.
pub fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    // Another subscriber may already own the global slot
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
