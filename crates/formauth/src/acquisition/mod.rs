//! Page acquisition: the HTTP transport and HTML form parsing.

pub mod form_parser;
pub mod http_client;
