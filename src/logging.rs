//! Console logging setup.
//!
//! All diagnostics go through [`tracing`] macros and are written to
//! stderr; user-facing output (change summaries, `ls`) is printed to
//! stdout by the commands themselves. The filter can be overridden with
//! the `DOOT_LOG` environment variable (standard `EnvFilter` syntax).

use tracing_subscriber::EnvFilter;

/// Initialise the global subscriber. Call once, from `main`.
pub fn init(verbose: bool, quiet: bool) {
    let default_filter = if quiet {
        "off"
    } else if verbose {
        "doot=debug"
    } else {
        "doot=warn"
    };
    let filter = EnvFilter::try_from_env("DOOT_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
