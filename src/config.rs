//! Startup configuration for the hook.

use anyhow::Context;
use bon::Builder;
use sentry::types::Dsn;
use sentry::{ClientOptions, IntoDsn};

/// Environment variable consulted when no explicit DSN is configured.
pub const SENTRY_DSN_VAR: &str = "SENTRY_DSN";

/// Configuration for [`attach()`](crate::attach). Constructed once at
/// startup and never mutated afterwards.
#[derive(Default, Builder)]
pub struct HookConfig {
    /// The Sentry DSN. Takes precedence over the `SENTRY_DSN` environment
    /// variable when both are present.
    pub dsn: Option<Dsn>,
    /// Custom response body for unstructured faults, used verbatim instead
    /// of the default message carrying the event reference.
    #[builder(into)]
    pub response_body: Option<String>,
    /// Forwarded as-is to the Sentry client initializer.
    #[builder(default)]
    pub client_options: ClientOptions,
}

/// Resolves the DSN to report with: the explicit value if one was given,
/// otherwise the `SENTRY_DSN` environment variable.
///
/// An unset (or empty) variable resolves to `Ok(None)`; a present but
/// unparsable value is a configuration error.
pub(crate) fn resolve_dsn(explicit: Option<Dsn>) -> anyhow::Result<Option<Dsn>> {
    if explicit.is_some() {
        return Ok(explicit);
    }

    env_var(SENTRY_DSN_VAR)?
        .into_dsn()
        .context("SENTRY_DSN is not a valid Sentry DSN value")
}

/// Reads an environment variable through [dotenvy], so a `.env` file in the
/// working directory works during development. Returns `Ok(None)` when the
/// variable is not set.
fn env_var(key: &str) -> anyhow::Result<Option<String>> {
    match dotenvy::var(key) {
        Ok(content) => Ok(Some(content)),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(None),
        Err(error) => Err(error.into()),
    }
}
