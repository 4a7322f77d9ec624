//! The catch-all error handler registered on the host framework.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use http::StatusCode;
use http::request::Parts;
use tracing::error;

use crate::errors::CaughtError;
use crate::reporter::{ErrorReporter, EventReference};

/// Path parameters captured by the host framework's router.
pub type RouteParams = HashMap<String, String>;

/// The handler that [`attach()`](crate::attach) registers as the host
/// framework's catch-all error handler.
///
/// Holds the reporter handle initialized once at startup; the hook itself
/// is stateless across requests.
pub struct ErrorHook {
    reporter: Arc<dyn ErrorReporter>,
    response_body: Option<String>,
}

impl fmt::Debug for ErrorHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHook")
            .field("response_body", &self.response_body)
            .finish_non_exhaustive()
    }
}

impl ErrorHook {
    /// Usually created through [`attach()`](crate::attach). Building one
    /// directly is useful in host application tests, with a mocked
    /// [`ErrorReporter`].
    pub fn new(reporter: Arc<dyn ErrorReporter>, response_body: Option<String>) -> Self {
        Self {
            reporter,
            response_body,
        }
    }

    /// Handles an error raised while processing a request.
    ///
    /// Mutates `res` in place. An `Err` return hands the error back to the
    /// host framework so its own default rendering still applies; `Ok`
    /// means the response is final.
    pub fn handle<B: From<String>>(
        &self,
        error: CaughtError,
        req: &Parts,
        res: &mut http::Response<B>,
        _params: &RouteParams,
    ) -> Result<(), CaughtError> {
        match error {
            CaughtError::Http(error) => {
                *res.status_mut() = error.status();
                *res.body_mut() = error.to_json().to_string().into();
                Err(CaughtError::Http(error))
            }
            CaughtError::GenericServerError(error) => {
                *res.status_mut() = error.status();
                *res.body_mut() = error.to_json().to_string().into();
                let reference = self.reporter.capture_error(&error);
                error!(
                    method = %req.method,
                    path = %req.uri.path(),
                    %reference,
                    "captured internal server error",
                );
                Ok(())
            }
            CaughtError::Fault(error) => {
                let error_ref: &(dyn Error + 'static) = error.as_ref();
                let reference = self.reporter.capture_error(error_ref);
                error!(
                    method = %req.method,
                    path = %req.uri.path(),
                    %reference,
                    "captured unexpected error",
                );
                *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                *res.body_mut() = self.fault_response_body(&reference).into();
                Ok(())
            }
        }
    }

    fn fault_response_body(&self, reference: &EventReference) -> String {
        match &self.response_body {
            Some(body) => body.clone(),
            // Clients match on this exact default string, stray quote
            // included.
            None => format!(
                "A server error occurred (reference code: {reference}\"). \
                 Please contact the administrator."
            ),
        }
    }
}
