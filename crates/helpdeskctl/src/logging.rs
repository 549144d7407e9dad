//! Logging setup for helpdeskctl
//!
//! Logs go to stderr so they never mix into the chat transcript on stdout.
//! Default level is `warn`; `--verbose` raises it to `debug` for the
//! helpdesk crates. `RUST_LOG` overrides both.

use tracing_subscriber::EnvFilter;

/// Filter directive used when RUST_LOG is unset
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,helpdesk_shared=debug,helpdeskctl=debug"
    } else {
        "warn"
    }
}

/// Install the global tracing subscriber
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
