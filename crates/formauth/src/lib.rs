//! # formauth
//!
//! Automated form-based login for unattended HTTP clients such as security
//! scanners. Given a login page URL and credentials, it finds the login form
//! on that page, fills and submits it, then decides whether the session is
//! active by looking for a marker string on a check page.
//!
//! ```no_run
//! use formauth::{LoginOrchestrator, RawOptions, ReqwestTransport, TransportConfig};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut options = RawOptions::default();
//! options.set("username", "alice")?;
//! options.set("password", "s3cret")?;
//! options.set("login_form_url", "https://app.example.com/login")?;
//! options.set("check_url", "https://app.example.com/account")?;
//! options.set("check_string", "Sign out")?;
//!
//! let transport = Arc::new(ReqwestTransport::new(&TransportConfig::default())?);
//! let mut login = LoginOrchestrator::new(options.validate()?, transport);
//! if login.login().await {
//!     println!("logged in");
//! }
//! # Ok(())
//! # }
//! ```

pub mod acquisition;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod login;

pub use acquisition::form_parser::{
    DocumentParser, FormDescriptor, FormEncoding, FormField, FormMethod, HtmlDocumentParser,
    HtmlForm, HtmlParserFactory, ParserFactory,
};
pub use acquisition::http_client::{HttpResponse, HttpTransport, ReqwestTransport, RequestOptions};
pub use config::{
    AutocompleteConfig, ConfigFile, Credentials, LoginEndpoint, OptionDescriptor, OptionKind,
    RawOptions, TransportConfig,
};
pub use diagnostics::{Diagnostic, DiagnosticSink, Level, RecordingSink, TracingSink};
pub use error::{ConfigError, FillError, ParseError, TransportError};
pub use login::filler::{fill, FilledForm};
pub use login::locator::select_login_form;
pub use login::orchestrator::{AttemptGate, LoginOrchestrator, LoginOutcome, LogoutOutcome};
pub use login::plugin::AuthPlugin;
pub use login::submit::submit_form;
pub use login::verifier::{body_has_marker, is_session_active};
