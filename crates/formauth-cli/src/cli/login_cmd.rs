//! Run one or more login attempts.

use crate::cli::output::{self, Styled};
use crate::cli::settings::{self, ConfigArgs};
use anyhow::{Context, Result};
use formauth::{LoginOrchestrator, LoginOutcome, ReqwestTransport};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

pub async fn run(args: &ConfigArgs, repeat: u32, json: bool) -> Result<ExitCode> {
    let (config, transport_config) = settings::resolve(args)?;
    let username = config.credentials.username().to_string();

    let transport =
        Arc::new(ReqwestTransport::new(&transport_config).context("failed to build HTTP client")?);
    let mut login = LoginOrchestrator::new(config, transport);

    let mut outcomes = Vec::new();
    for attempt in 1..=repeat.max(1) {
        let outcome = login.attempt().await;
        info!(attempt, outcome = outcome.as_str(), "login attempt finished");
        outcomes.push(outcome);
    }

    let success = outcomes.last().is_some_and(|o| o.is_success());

    if json {
        output::print_json(&serde_json::json!({
            "username": username,
            "attempts": outcomes,
            "gate": login.gate(),
            "success": success,
        }));
    } else {
        let s = Styled::new();
        output::print_header(&s);
        for (i, outcome) in outcomes.iter().enumerate() {
            let symbol = if outcome.is_success() {
                s.ok_sym()
            } else {
                s.fail_sym()
            };
            output::print_check(symbol, &format!("attempt {}", i + 1), outcome.as_str());
        }
        if !login.gate().is_open() {
            output::print_detail("login disabled: check login_form_url");
        }
    }

    Ok(exit_code(&outcomes))
}

fn exit_code(outcomes: &[LoginOutcome]) -> ExitCode {
    match outcomes.last() {
        Some(o) if o.is_success() => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
