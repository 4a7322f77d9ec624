//! Error types handed to the catch-all hook.
//!
//! Application code signals failures as [`CaughtError`] values:
//!
//! * [`CaughtError::Http`] is a deliberate, structured HTTP error. The hook
//!   writes its status and payload to the response and then re-raises it so
//!   the host framework's own rendering still applies. These are never
//!   reported to Sentry.
//! * [`CaughtError::GenericServerError`] is the framework's generic
//!   "500 Internal Server Error" variant. It is the only structured error
//!   that gets reported.
//! * [`CaughtError::Fault`] wraps any other error. Faults are reported and
//!   answered with a generic 500. The blanket `From` impl means `?` on a
//!   `Result<_, CaughtError>` lands here.

use std::error::Error;
use std::fmt;

use http::StatusCode;
use serde_json::json;

/// A structured HTTP error with a status code and a JSON-serializable
/// payload, analogous to the error responses the host framework produces
/// itself.
#[derive(Debug, Clone)]
pub struct HttpError {
    status: StatusCode,
    title: String,
    description: Option<String>,
}

impl HttpError {
    pub fn new<S: ToString + ?Sized>(status: StatusCode, title: &S) -> Self {
        Self {
            status,
            title: title.to_string(),
            description: None,
        }
    }

    pub fn with_description<S: ToString + ?Sized>(mut self, description: &S) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The dict form of the error, as written into response bodies.
    pub fn to_json(&self) -> serde_json::Value {
        match &self.description {
            Some(description) => json!({ "title": self.title, "description": description }),
            None => json!({ "title": self.title }),
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.title.fmt(f)
    }
}

impl Error for HttpError {}

/// The error value the host framework hands to the catch-all hook.
#[derive(Debug)]
pub enum CaughtError {
    /// A structured error the application raised deliberately, client-side
    /// or server-side.
    Http(HttpError),
    /// The framework's generic internal server error. Distinguished by tag,
    /// not by status code: a custom structured error carrying status 500 is
    /// still [`CaughtError::Http`].
    GenericServerError(HttpError),
    /// An unexpected failure with no HTTP shape of its own.
    Fault(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for CaughtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaughtError::Http(error) => error.fmt(f),
            CaughtError::GenericServerError(error) => error.fmt(f),
            CaughtError::Fault(error) => error.fmt(f),
        }
    }
}

impl<E: Error + Send + Sync + 'static> From<E> for CaughtError {
    fn from(error: E) -> Self {
        CaughtError::Fault(Box::new(error))
    }
}

/// Returns an error with status 400 and the provided title
pub fn bad_request<S: ToString + ?Sized>(title: &S) -> CaughtError {
    CaughtError::Http(HttpError::new(StatusCode::BAD_REQUEST, title))
}

pub fn not_found() -> CaughtError {
    CaughtError::Http(HttpError::new(StatusCode::NOT_FOUND, "Not Found"))
}

/// Returns an error with status 503 and the provided title
pub fn service_unavailable<S: ToString + ?Sized>(title: &S) -> CaughtError {
    CaughtError::Http(HttpError::new(StatusCode::SERVICE_UNAVAILABLE, title))
}

/// Returns the framework's generic "500 Internal Server Error" variant.
///
/// This is the only constructor producing [`CaughtError::GenericServerError`],
/// and therefore the only structured error the hook reports.
pub fn internal_server_error() -> CaughtError {
    CaughtError::GenericServerError(HttpError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "500 Internal Server Error",
    ))
}
