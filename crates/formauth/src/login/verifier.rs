//! Session liveness check.

use crate::acquisition::http_client::{HttpTransport, RequestOptions};
use crate::config::LoginEndpoint;
use crate::diagnostics::DiagnosticSink;

/// Literal, case-sensitive containment of `check_string` in `body`.
pub fn body_has_marker(body: &str, check_string: &str) -> bool {
    body.contains(check_string)
}

/// GET the check page and look for the marker string.
///
/// Fails closed: an unreachable check page means "not logged in".
/// `username` is only used in diagnostics.
pub async fn is_session_active(
    transport: &dyn HttpTransport,
    endpoint: &LoginEndpoint,
    username: &str,
    sink: &dyn DiagnosticSink,
) -> bool {
    let response = match transport
        .get(endpoint.check_url(), RequestOptions::LOGIN)
        .await
    {
        Ok(r) => r,
        Err(e) => {
            sink.debug(&format!(
                "Failed to check if current authentication session is active: {e}"
            ));
            return false;
        }
    };

    let logged_in = body_has_marker(response.body(), endpoint.check_string());

    if logged_in {
        sink.debug(&format!(
            "User \"{username}\" is currently logged into the application"
        ));
    } else {
        sink.debug(&format!(
            "User \"{username}\" is NOT logged into the application"
        ));
    }

    logged_in
}
