//! Login form selection.
//!
//! A page may carry several forms. The one used for login is the first form,
//! in document order, that is classified as a login form and submits to the
//! configured domain. Later qualifying forms never replace it; each one is
//! only reported as ambiguous.

use crate::acquisition::form_parser::FormDescriptor;
use crate::diagnostics::DiagnosticSink;
use url::Url;

/// Pick the login form out of `forms`.
///
/// `target_domain` is compared for exact equality with the host of each
/// form's action. `login_form_url` only appears in the diagnostic emitted
/// when nothing qualifies. Returning `None` is a normal outcome.
pub fn select_login_form<I>(
    forms: I,
    target_domain: &str,
    login_form_url: &Url,
    sink: &dyn DiagnosticSink,
) -> Option<Box<dyn FormDescriptor>>
where
    I: IntoIterator<Item = Box<dyn FormDescriptor>>,
{
    let mut selected: Option<Box<dyn FormDescriptor>> = None;

    for form in forms {
        if !form.is_login_form() {
            continue;
        }

        if form.action().host_str().unwrap_or_default() != target_domain {
            continue;
        }

        if selected.is_some() {
            sink.debug(&format!(
                "There are two or more login forms in the login_form_url; ignoring the one \
                 posting to {} and using the first identified form",
                form.action()
            ));
            continue;
        }

        selected = Some(form);
    }

    if selected.is_none() {
        sink.error(&format!(
            "Failed to find an HTML login form at {login_form_url}. The authentication \
             plugin is most likely incorrectly configured."
        ));
    }

    selected
}
