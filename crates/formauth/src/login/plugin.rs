//! Authentication plugin surface for scanner hosts.

use crate::config::{OptionDescriptor, RawOptions};
use crate::error::ConfigError;
use crate::login::orchestrator::{LoginOrchestrator, LogoutOutcome};
use async_trait::async_trait;

/// What a host needs from an authentication plugin to keep a session alive.
#[async_trait]
pub trait AuthPlugin: Send + Sync {
    /// Short identifier.
    fn name(&self) -> &'static str;

    /// Operator-facing description of what the plugin does.
    fn long_description(&self) -> &'static str;

    /// Options with their current values.
    fn options(&self) -> Vec<OptionDescriptor>;

    /// Validate and apply new options.
    fn set_options(&mut self, options: &RawOptions) -> Result<(), ConfigError>;

    async fn login(&mut self) -> bool;

    fn logout(&mut self) -> LogoutOutcome;

    async fn has_active_session(&self) -> bool;
}

const LONG_DESCRIPTION: &str = "\
Logs into web applications that use a plain HTML login form, including forms
protected by CSRF tokens.

The plugin sends an HTTP GET request to `login_form_url`, finds the login form
in the returned HTML, fills in the `username` and `password` fields, keeps
every other field (hidden tokens included) and submits the form, usually with
an HTTP POST. It then requests `check_url` and considers the session active
when `check_string` appears in the response.

If no login form is found at `login_form_url` the configuration is assumed to
be wrong and no further login attempts are made.

The following configurable parameters exist:
    - username
    - password
    - login_form_url
    - check_url
    - check_string
";

#[async_trait]
impl AuthPlugin for LoginOrchestrator {
    fn name(&self) -> &'static str {
        "form_login"
    }

    fn long_description(&self) -> &'static str {
        LONG_DESCRIPTION
    }

    fn options(&self) -> Vec<OptionDescriptor> {
        self.config().descriptors()
    }

    fn set_options(&mut self, options: &RawOptions) -> Result<(), ConfigError> {
        self.reconfigure(options)
    }

    async fn login(&mut self) -> bool {
        LoginOrchestrator::login(self).await
    }

    fn logout(&mut self) -> LogoutOutcome {
        LoginOrchestrator::logout(self)
    }

    async fn has_active_session(&self) -> bool {
        LoginOrchestrator::has_active_session(self).await
    }
}
