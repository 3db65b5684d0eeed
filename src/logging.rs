//! Diagnostic logging via `tracing`, written to stderr so it never mixes
//! with the tables and progress output on stdout.

use tracing_subscriber::EnvFilter;

/// Picks the log filter: `RUST_LOG` wins, then `--verbose`, then the
/// configured level.
pub fn filter_directive(rust_log: Option<&str>, verbose: bool, configured: &str) -> String {
    match rust_log {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ if verbose => "debug".to_string(),
        _ => configured.to_string(),
    }
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init_tracing(verbose: bool, configured: &str) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(rust_log.as_deref(), verbose, configured);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_takes_precedence() {
        assert_eq!(filter_directive(Some("trace"), true, "warn"), "trace");
    }

    #[test]
    fn verbose_beats_configured_level() {
        assert_eq!(filter_directive(None, true, "error"), "debug");
        assert_eq!(filter_directive(Some("  "), true, "error"), "debug");
    }

    #[test]
    fn configured_level_is_the_fallback() {
        assert_eq!(filter_directive(None, false, "info"), "info");
    }
}
