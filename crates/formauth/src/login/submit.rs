//! Form submission.

use crate::acquisition::http_client::{HttpTransport, RequestOptions};
use crate::diagnostics::DiagnosticSink;
use crate::login::filler::FilledForm;

/// Send `form` to its action URL.
///
/// Returns `true` once the transport produced a response, whatever its
/// status. Transport errors are reported at debug level and yield `false`.
pub async fn submit_form(
    transport: &dyn HttpTransport,
    form: FilledForm,
    sink: &dyn DiagnosticSink,
) -> bool {
    match transport.send(&form, RequestOptions::LOGIN).await {
        Ok(_) => true,
        Err(e) => {
            sink.debug(&format!("Failed to submit the login form: {e}"));
            false
        }
    }
}
