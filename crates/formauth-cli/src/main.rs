//! formauth: run and check form-based logins from the command line.

mod cli;

use clap::{Parser, Subcommand};
use cli::output::Styled;
use cli::settings::ConfigArgs;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "formauth", version, about = "Log into web applications through their HTML login form")]
struct Cli {
    /// Print machine-readable JSON on stdout.
    #[arg(long, global = true)]
    json: bool,

    /// Show debug diagnostics.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the login options with their defaults.
    Options,
    /// Fetch the login page, submit the login form and verify the session.
    Login {
        #[command(flatten)]
        source: ConfigArgs,
        /// Number of consecutive attempts.
        #[arg(long, default_value_t = 1)]
        repeat: u32,
    },
    /// Check whether the session is active. Without `--login` the check page
    /// is fetched with no cookies, so only sessions that need none show up.
    Check {
        #[command(flatten)]
        source: ConfigArgs,
        /// Log in first and check with the resulting session.
        #[arg(long)]
        login: bool,
    },
}

fn init_tracing(verbose: bool, json_logs: bool) {
    let default = if verbose {
        "formauth=debug"
    } else {
        "formauth=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    let result = match &cli.command {
        Command::Options => cli::options_cmd::run(cli.json).map(|()| ExitCode::SUCCESS),
        Command::Login { source, repeat } => cli::login_cmd::run(source, *repeat, cli.json).await,
        Command::Check { source, login } => cli::check_cmd::run(source, *login, cli.json).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("  {} {e:#}", Styled::new().fail_sym());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_login_with_overrides() {
        let cli = Cli::try_parse_from([
            "formauth",
            "login",
            "-c",
            "auth.json",
            "-o",
            "password=s3cret",
            "--repeat",
            "3",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Command::Login { source, repeat } => {
                assert_eq!(repeat, 3);
                assert_eq!(source.overrides, vec!["password=s3cret"]);
                assert_eq!(source.config.unwrap().to_str(), Some("auth.json"));
            }
            other => panic!("expected login, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_check_with_login() {
        let cli = Cli::try_parse_from(["formauth", "check", "--login", "-o", "username=alice"]).unwrap();

        match cli.command {
            Command::Check { source, login } => {
                assert!(login);
                assert_eq!(source.overrides, vec!["username=alice"]);
            }
            other => panic!("expected check, got {other:?}"),
        }
    }
}
