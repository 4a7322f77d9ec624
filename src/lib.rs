#![doc = include_str!("../README.md")]

pub mod config;
pub mod errors;
pub mod hook;
pub mod reporter;

pub use config::HookConfig;
pub use errors::{
    CaughtError, HttpError, bad_request, internal_server_error, not_found, service_unavailable,
};
pub use hook::{ErrorHook, RouteParams};
pub use reporter::{ErrorReporter, EventReference, SentryReporter};

use std::sync::Arc;
use tracing::warn;

/// Implemented by host frameworks that can install a single catch-all
/// error handler.
pub trait HookHost {
    fn add_error_handler(&mut self, hook: ErrorHook);
}

/// Wires `app`'s catch-all error handling to Sentry and returns the app.
///
/// The DSN is taken from `config`, or from the `SENTRY_DSN` environment
/// variable as a fallback. When neither yields a usable DSN — including a
/// variable that is set but unparsable — no handler is registered and the
/// app is returned unmodified, with a warning: reporting is disabled, not
/// broken.
///
/// Otherwise the Sentry client is initialized once with the resolved DSN
/// and `config.client_options`, and an [`ErrorHook`] holding that client is
/// registered on `app`.
pub fn attach<A: HookHost>(mut app: A, config: HookConfig) -> A {
    let HookConfig {
        dsn,
        response_body,
        client_options,
    } = config;

    let dsn = match config::resolve_dsn(dsn) {
        Ok(Some(dsn)) => dsn,
        Ok(None) => {
            warn!(
                "No Sentry DSN given or found in the SENTRY_DSN environment variable, \
                 skipping error handler registration"
            );
            return app;
        }
        Err(error) => {
            warn!(
                %error,
                "Failed to read the Sentry DSN from the environment, \
                 skipping error handler registration"
            );
            return app;
        }
    };

    let reporter = SentryReporter::new(dsn, client_options);
    app.add_error_handler(ErrorHook::new(Arc::new(reporter), response_body));
    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_helpers::{lock_env, remove_dsn_var, set_dsn_var};
    use claims::{assert_none, assert_some};
    use http::StatusCode;
    use sentry::ClientOptions;
    use sentry::test::TestTransport;

    const DSN: &str = "https://00000000000000000000000000000000@sentry.invalid/0000000";

    #[derive(Default)]
    struct FakeApp {
        hook: Option<ErrorHook>,
    }

    impl HookHost for FakeApp {
        fn add_error_handler(&mut self, hook: ErrorHook) {
            self.hook = Some(hook);
        }
    }

    /// Runs `route` the way a host framework would: on an error, the
    /// registered hook gets the request parts and the in-flight response.
    /// A re-raised error needs no further rendering here since the hook has
    /// already written the structured error's own status and payload.
    fn simulate_get(
        app: &FakeApp,
        path: &str,
        route: impl FnOnce(&mut http::Response<String>) -> Result<(), CaughtError>,
    ) -> http::Response<String> {
        let request = http::Request::builder()
            .method("GET")
            .uri(path)
            .body(())
            .unwrap();
        let (parts, _) = request.into_parts();

        let mut response = http::Response::new(String::new());
        if let Err(error) = route(&mut response) {
            let hook = app.hook.as_ref().expect("no error handler registered");
            let _ = hook.handle(error, &parts, &mut response, &RouteParams::new());
        }
        response
    }

    fn app_with_test_transport() -> (FakeApp, Arc<TestTransport>) {
        let transport = TestTransport::new();
        let options = ClientOptions {
            transport: Some(Arc::new(transport.clone())),
            ..Default::default()
        };

        let config = HookConfig::builder()
            .dsn(DSN.parse().unwrap())
            .client_options(options)
            .build();

        (attach(FakeApp::default(), config), transport)
    }

    #[test]
    fn route_without_error_is_left_alone() {
        let (app, transport) = app_with_test_transport();

        let res = simulate_get(&app, "/hello-world", |res| {
            *res.body_mut() = "hello world!".to_string();
            Ok(())
        });

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.body(), "hello world!");
        assert!(transport.fetch_and_clear_events().is_empty());
    }

    #[test]
    fn fault_is_reported_and_answered_with_a_500() {
        let (app, transport) = app_with_test_transport();

        let res = simulate_get(&app, "/unhappy", |_res| {
            Err(CaughtError::from(std::io::Error::other("Something went wrong!")))
        });

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(res.body().starts_with("A server error occurred (reference code:"));
        assert_eq!(transport.fetch_and_clear_events().len(), 1);
    }

    #[test]
    fn bad_request_is_rendered_but_not_reported() {
        let (app, transport) = app_with_test_transport();

        let res = simulate_get(&app, "/400", |_res| Err(bad_request("Bad request")));

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        insta::assert_snapshot!(res.body(), @r#"{"title":"Bad request"}"#);
        assert!(transport.fetch_and_clear_events().is_empty());
    }

    #[test]
    fn generic_server_error_is_rendered_and_reported() {
        let (app, transport) = app_with_test_transport();

        let res = simulate_get(&app, "/500", |_res| Err(internal_server_error()));

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        insta::assert_snapshot!(res.body(), @r#"{"title":"500 Internal Server Error"}"#);
        assert_eq!(transport.fetch_and_clear_events().len(), 1);
    }

    #[test]
    fn attach_without_any_dsn_registers_nothing() {
        let _guard = lock_env();
        remove_dsn_var();

        let app = attach(FakeApp::default(), HookConfig::default());
        assert_none!(app.hook);
    }

    #[test]
    fn attach_with_an_unparsable_dsn_var_registers_nothing() {
        let _guard = lock_env();
        set_dsn_var("not a dsn");

        let app = attach(FakeApp::default(), HookConfig::default());
        assert_none!(app.hook);
    }

    #[test]
    fn attach_reads_the_dsn_from_the_environment() {
        let _guard = lock_env();
        set_dsn_var(DSN);

        let app = attach(FakeApp::default(), HookConfig::default());
        assert_some!(app.hook);
    }

    #[test]
    fn explicit_dsn_wins_over_a_broken_environment() {
        let _guard = lock_env();
        set_dsn_var("not a dsn");

        let config = HookConfig::builder().dsn(DSN.parse().unwrap()).build();
        let app = attach(FakeApp::default(), config);
        assert_some!(app.hook);
    }
}
