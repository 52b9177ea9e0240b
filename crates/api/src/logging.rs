//! Tracing subscriber setup.
//!
//! Library code only emits through the `tracing` macros; the binary builds
//! the subscriber once, from configuration, at startup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

use crate::config::Environment;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "tixer_api=debug,tixer_db=debug,tower_http=debug";

/// Install the process subscriber: readable text locally, JSON lines in
/// every deployed environment.
pub fn init(environment: Environment) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match environment {
        Environment::Local => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        Environment::Development | Environment::Staging | Environment::Production => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init(),
    }
}
