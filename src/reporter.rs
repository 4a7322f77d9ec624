//! The reporting-backend seam.
//!
//! The hook only talks to [`ErrorReporter`], so host application tests can
//! swap in `MockErrorReporter` (via the `mock` feature) and assert on
//! capture calls without a Sentry project.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use sentry::types::Dsn;
use sentry::{Client, ClientOptions, Hub, Scope};

/// Opaque reference to an event recorded by the reporting backend, suitable
/// for interpolation into user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventReference(String);

impl EventReference {
    pub fn new<S: Into<String>>(reference: S) -> Self {
        Self(reference.into())
    }
}

impl fmt::Display for EventReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait ErrorReporter: Send + Sync {
    /// Reports the error to the backend and returns a reference to the
    /// recorded event.
    fn capture_error(&self, error: &(dyn Error + 'static)) -> EventReference;
}

/// [`ErrorReporter`] backed by a dedicated Sentry client.
///
/// The client and hub are owned by this struct instead of being installed
/// as the SDK's process-wide hub, so hosting several instrumented apps in
/// one process keeps their reporting separate. Capture calls are safe from
/// concurrent request threads; the SDK's transport handles its own
/// buffering and timeouts.
pub struct SentryReporter {
    client: Arc<Client>,
    hub: Hub,
}

impl SentryReporter {
    /// Initializes the Sentry client once with the given DSN and options.
    pub fn new(dsn: Dsn, mut options: ClientOptions) -> Self {
        options.dsn = Some(dsn);
        let client = Arc::new(Client::from_config(options));
        let hub = Hub::new(Some(client.clone()), Arc::new(Scope::default()));
        Self { client, hub }
    }
}

impl ErrorReporter for SentryReporter {
    fn capture_error(&self, error: &(dyn Error + 'static)) -> EventReference {
        let event_id = self.hub.capture_error(error);
        EventReference::new(event_id.to_string())
    }
}

impl Drop for SentryReporter {
    fn drop(&mut self) {
        // Flushes events still sitting in the transport queue.
        self.client.close(None);
    }
}
