use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Initialize console logging to stderr.
///
/// Diagnostics stay on stderr so rendered tables on stdout remain pipeable.
/// `RUST_LOG` overrides the default filter; sqlx's per-statement logging is
/// capped at warn to keep query output readable.
pub fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("query_stash={level},sqlx=warn,{level}")));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();

    Registry::default().with(env_filter).with(console_layer).init();

    debug!("logging initialized at level: {level}");
}
