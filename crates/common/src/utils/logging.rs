use std::io;
use tracing_subscriber::{fmt, EnvFilter};

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{level},tower_http=info,sqlx=warn")))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global tracing subscriber.
/// - Respects `RUST_LOG` if set, otherwise uses `level`
/// - `json = true` emits one JSON object per event, else compact text
/// - Writes to stdout
pub fn init_logging(level: &str, json: bool) {
    if json {
        let _ = fmt()
            .with_env_filter(filter(level))
            .with_target(false)
            .json()
            .with_writer(io::stdout)
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter(level))
            .with_target(false)
            .compact()
            .with_writer(io::stdout)
            .try_init();
    }
}
