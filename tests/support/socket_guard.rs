//! Skip-or-fail guard for tests that need to bind a localhost socket.
//!
//! Sandboxed environments sometimes refuse local socket binds, which would
//! fail every wiremock-backed test for reasons unrelated to the code under
//! test. These helpers probe for bind support and skip (or fail fast when
//! `APKPURE_REQUIRE_SOCKET_TESTS` is set) instead.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

#[must_use]
#[allow(dead_code)]
pub fn socket_tests_required() -> bool {
    std::env::var("APKPURE_REQUIRE_SOCKET_TESTS")
        .ok()
        .is_some_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

#[track_caller]
#[must_use]
#[allow(dead_code)]
pub fn should_skip_socket_bound_test() -> bool {
    if TcpListener::bind("127.0.0.1:0").is_ok() {
        return false;
    }

    let location = Location::caller();
    let message = format!(
        "[socket-bound-test] cannot bind localhost socket at {}:{}; wiremock-based test cannot run in this environment",
        location.file(),
        location.line()
    );
    if socket_tests_required() {
        panic!("{message}. Set APKPURE_REQUIRE_SOCKET_TESTS=0 to allow local skip behavior.");
    }

    eprintln!(
        "{message}. Skipping test. Set APKPURE_REQUIRE_SOCKET_TESTS=1 to fail-fast instead."
    );
    true
}

#[allow(dead_code)]
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if should_skip_socket_bound_test() {
        None
    } else {
        Some(MockServer::start().await)
    }
}
