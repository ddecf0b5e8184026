//! Logging init: structured diagnostics on stderr, filtered by verbosity.

use tracing_subscriber::EnvFilter;

use crate::cli::VerbosityLevel;

/// Default filter directive for a verbosity level
pub fn default_directive(verbosity: VerbosityLevel) -> &'static str {
    match verbosity {
        VerbosityLevel::Quiet => "error",
        VerbosityLevel::Normal => "warn",
        VerbosityLevel::Verbose => "info,sitemap_audit=debug",
    }
}

/// Initialize logging to stderr. `RUST_LOG` takes precedence over the verbosity flags.
pub fn init_logging(verbosity: VerbosityLevel) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    // Ignore a second init (e.g. from tests); the first subscriber stays active
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init();
}
