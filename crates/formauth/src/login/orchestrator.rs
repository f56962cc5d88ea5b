//! The login state machine.
//!
//! [`LoginOrchestrator::login`] runs one attempt: fetch the login page, pick
//! the login form, fill and submit it, then check the session. Any stage can
//! end the attempt early. Only a missing login form (or a login page no
//! parser understands) closes the [`AttemptGate`]; that points at a broken
//! configuration, so later calls return `false` without touching the
//! network. Network failures leave the gate open and the next call retries.

use crate::acquisition::form_parser::{FormDescriptor, HtmlParserFactory, ParserFactory};
use crate::acquisition::http_client::{HttpTransport, RequestOptions};
use crate::config::{AutocompleteConfig, RawOptions};
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::ConfigError;
use crate::login::filler::fill;
use crate::login::locator::select_login_form;
use crate::login::submit::submit_form;
use crate::login::verifier::is_session_active;
use serde::Serialize;
use std::sync::Arc;

/// Whether login attempts are still allowed for this orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptGate {
    Open,
    /// No usable login form was found. There is no way back to `Open`.
    PermanentlyClosed,
}

impl AttemptGate {
    pub fn is_open(self) -> bool {
        self == AttemptGate::Open
    }

    fn close(&mut self) {
        *self = AttemptGate::PermanentlyClosed;
    }
}

/// How a single login attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginOutcome {
    Success,
    /// The gate was already closed; nothing was sent.
    GateClosed,
    LoginPageUnavailable,
    ParserUnavailable,
    FormNotFound,
    FillFailed,
    SubmissionFailed,
    SessionInactive,
}

impl LoginOutcome {
    pub fn is_success(self) -> bool {
        self == LoginOutcome::Success
    }

    /// Outcomes that mean the configuration cannot work.
    fn closes_gate(self) -> bool {
        matches!(
            self,
            LoginOutcome::FormNotFound | LoginOutcome::ParserUnavailable
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LoginOutcome::Success => "success",
            LoginOutcome::GateClosed => "gate closed",
            LoginOutcome::LoginPageUnavailable => "login page unavailable",
            LoginOutcome::ParserUnavailable => "no parser for login page",
            LoginOutcome::FormNotFound => "login form not found",
            LoginOutcome::FillFailed => "login form cannot be filled",
            LoginOutcome::SubmissionFailed => "submission failed",
            LoginOutcome::SessionInactive => "session inactive",
        }
    }
}

/// Result of [`LoginOrchestrator::logout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoutOutcome {
    /// Form login has no logout step.
    NotApplicable,
}

/// Drives form-based login for one configuration.
///
/// Not meant for concurrent use: `login` takes `&mut self`, so sharing one
/// orchestrator between tasks needs an external lock.
pub struct LoginOrchestrator {
    config: AutocompleteConfig,
    transport: Arc<dyn HttpTransport>,
    parsers: Arc<dyn ParserFactory>,
    sink: Arc<dyn DiagnosticSink>,
    gate: AttemptGate,
}

impl LoginOrchestrator {
    /// New orchestrator with an open gate, the HTML parser and `tracing`
    /// diagnostics.
    pub fn new(config: AutocompleteConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            transport,
            parsers: Arc::new(HtmlParserFactory),
            sink: Arc::new(TracingSink),
            gate: AttemptGate::Open,
        }
    }

    pub fn with_parsers(mut self, parsers: Arc<dyn ParserFactory>) -> Self {
        self.parsers = parsers;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &AutocompleteConfig {
        &self.config
    }

    pub fn gate(&self) -> AttemptGate {
        self.gate
    }

    /// Replace the configuration after validating `options`.
    ///
    /// A new configuration counts as a new orchestrator: the gate reopens. On
    /// error the previous configuration and gate are kept.
    pub fn reconfigure(&mut self, options: &RawOptions) -> Result<(), ConfigError> {
        self.config = options.validate()?;
        self.gate = AttemptGate::Open;
        Ok(())
    }

    /// Log in. `true` only when the check page confirms the session.
    pub async fn login(&mut self) -> bool {
        self.attempt().await.is_success()
    }

    /// Run one login attempt and report how it ended.
    pub async fn attempt(&mut self) -> LoginOutcome {
        if !self.gate.is_open() {
            return LoginOutcome::GateClosed;
        }

        let username = self.config.credentials.username().to_string();
        self.sink.debug(&format!(
            "Logging into the application with user: {username}"
        ));

        let form = match self.locate_form().await {
            Ok(form) => form,
            Err(outcome) => {
                if outcome.closes_gate() {
                    self.gate.close();
                }
                return outcome;
            }
        };

        let filled = match fill(form.as_ref(), &self.config.credentials) {
            Ok(filled) => filled,
            Err(e) => {
                self.sink
                    .error(&format!("Failed to fill the login form: {e}"));
                return LoginOutcome::FillFailed;
            }
        };

        if !submit_form(&*self.transport, filled, &*self.sink).await {
            return LoginOutcome::SubmissionFailed;
        }

        if !self.has_active_session().await {
            self.sink.error(&format!(
                "Can't login into the web application as {username}"
            ));
            return LoginOutcome::SessionInactive;
        }

        self.sink.debug(&format!("Login success for {username}"));
        LoginOutcome::Success
    }

    /// Form login has nothing to undo; no request is sent.
    pub fn logout(&mut self) -> LogoutOutcome {
        LogoutOutcome::NotApplicable
    }

    /// Check the session without logging in.
    pub async fn has_active_session(&self) -> bool {
        is_session_active(
            &*self.transport,
            &self.config.endpoint,
            self.config.credentials.username(),
            &*self.sink,
        )
        .await
    }

    /// Fetch the login page and select its login form.
    async fn locate_form(&self) -> Result<Box<dyn FormDescriptor>, LoginOutcome> {
        let endpoint = &self.config.endpoint;

        let page = match self
            .transport
            .get(endpoint.login_form_url(), RequestOptions::LOGIN)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                self.sink
                    .debug(&format!("Failed to HTTP GET the login_form_url: {e}"));
                return Err(LoginOutcome::LoginPageUnavailable);
            }
        };

        let forms = match self.parsers.parser_for(&page) {
            Ok(parser) => parser.forms(),
            Err(e) => {
                self.sink.debug(&format!(
                    "Failed to find a parser for the login_form_url: {e}"
                ));
                return Err(LoginOutcome::ParserUnavailable);
            }
        };

        select_login_form(
            forms,
            endpoint.login_domain(),
            endpoint.login_form_url(),
            &*self.sink,
        )
        .ok_or(LoginOutcome::FormNotFound)
    }
}
