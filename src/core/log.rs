use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

/// Directives applied when `RUST_LOG` is unset. Verbose mode shows this
/// crate's debug output and the HTTP client's requests; otherwise nothing is
/// logged, since failures reach the user through the returned error.
fn default_directives(verbose: bool) -> String {
    if verbose {
        format!("{}=debug,reqwest=info", env!("CARGO_CRATE_NAME"))
    } else {
        "off".to_string()
    }
}

/// Builds the filter: `RUST_LOG` when set and valid, else the defaults.
fn build_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directives(verbose)))
}

/// Installs the global subscriber, writing to stderr so table output on
/// stdout stays clean.
pub fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(rust_log.as_deref(), verbose);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .without_time()
                .with_target(verbose)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
