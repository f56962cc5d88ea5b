//! CLI subcommand implementations for the formauth binary.

pub mod check_cmd;
pub mod login_cmd;
pub mod options_cmd;
pub mod output;
pub mod settings;
