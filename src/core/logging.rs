//! Logger handles.
//!
//! A logger is a `tracing` [`Dispatch`]. Library events are emitted through
//! whichever dispatcher the caller injected, so an application can route
//! hostdata logs separately from its global subscriber.

use tracing::Dispatch;

/// Default logger: human-readable events on stderr.
pub fn default_logger() -> Dispatch {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    Dispatch::new(subscriber)
}

/// Run `f` with `logger` as the current dispatcher.
pub fn with_logger<T>(logger: &Dispatch, f: impl FnOnce() -> T) -> T {
    tracing::dispatcher::with_default(logger, f)
}
