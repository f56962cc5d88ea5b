//! Report whether the configured session is currently active.

use crate::cli::output::{self, Styled};
use crate::cli::settings::{self, ConfigArgs};
use anyhow::{Context, Result};
use formauth::{LoginOrchestrator, LoginOutcome, ReqwestTransport};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

/// Result of one `check` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    /// Outcome of the login run first, when one was requested.
    pub login: Option<LoginOutcome>,
    pub active: bool,
}

/// Optionally log in, then query the check page on the same transport so
/// any session cookies from the login are sent along.
pub async fn check_session(login: &mut LoginOrchestrator, login_first: bool) -> SessionReport {
    let outcome = if login_first {
        let outcome = login.attempt().await;
        info!(outcome = outcome.as_str(), "login attempt finished");
        Some(outcome)
    } else {
        None
    };

    SessionReport {
        login: outcome,
        active: login.has_active_session().await,
    }
}

pub async fn run(args: &ConfigArgs, login_first: bool, json: bool) -> Result<ExitCode> {
    let (config, transport_config) = settings::resolve(args)?;
    let check_url = config.endpoint.check_url().to_string();

    let transport =
        Arc::new(ReqwestTransport::new(&transport_config).context("failed to build HTTP client")?);
    let mut login = LoginOrchestrator::new(config, transport);

    let report = check_session(&mut login, login_first).await;

    if json {
        output::print_json(&serde_json::json!({
            "check_url": check_url,
            "login": report.login,
            "active": report.active,
        }));
    } else {
        let s = Styled::new();
        if let Some(outcome) = report.login {
            let symbol = if outcome.is_success() {
                s.ok_sym()
            } else {
                s.fail_sym()
            };
            output::print_check(symbol, "login", outcome.as_str());
        }
        let (symbol, state) = if report.active {
            (s.ok_sym(), s.green("active"))
        } else {
            (s.fail_sym(), s.red("not active"))
        };
        output::print_check(symbol, "session", &state);
        output::print_detail(&check_url);
    }

    Ok(if report.active {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
