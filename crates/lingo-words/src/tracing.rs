//! Log output for processes embedding the vocabulary services.
//!
//! The services only emit `tracing` events; installing a subscriber is left
//! to the caller through [`init_tracing`].

use tracing_subscriber::{
    EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

use crate::config::Environment;

/// Filter used when `RUST_LOG` is unset or invalid.
///
/// Development shows the per-read `debug!` events of `lingo_words` and
/// `lingo_db`; production keeps only committed writes, rollbacks and
/// rejections at `info`/`warn`. `sqlx` statement logging stays at `warn` in
/// both.
const fn default_filter(env: Environment) -> &'static str {
    match env {
        Environment::Development => "info,lingo_words=debug,lingo_db=debug,sqlx=warn",
        Environment::Production => "info,sqlx=warn",
    }
}

fn env_filter(env: Environment) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(env)))
}

/// Install the global subscriber: pretty multi-line output with source
/// locations in development, one flattened JSON object per event in
/// production.
///
/// Returns an error when a global subscriber is already set, so tests and
/// hosts with their own subscriber can call it unconditionally.
pub fn init_tracing(env: &Environment) -> Result<(), TryInitError> {
    let env = *env;
    let registry = tracing_subscriber::registry();

    match env {
        Environment::Development => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(env_filter(env)),
            )
            .try_init()?,
        Environment::Production => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_filter(env_filter(env)),
            )
            .try_init()?,
    }

    tracing::debug!(?env, "vocabulary tracing installed");
    Ok(())
}
