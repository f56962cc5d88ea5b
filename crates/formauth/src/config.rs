//! Operator configuration for the form login workflow.
//!
//! [`RawOptions`] is the untyped, operator-facing surface: five string
//! options that can be loaded from JSON or set one by one. Validating it
//! yields an [`AutocompleteConfig`], the only way to obtain the typed
//! [`Credentials`] and [`LoginEndpoint`] the orchestrator needs. Every
//! option is required and must be non-empty.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default value of the `login_form_url` option.
pub const DEFAULT_LOGIN_FORM_URL: &str = "http://host.tld/login";
/// Default value of the `check_url` option.
pub const DEFAULT_CHECK_URL: &str = "http://host.tld/check";

/// Value type of an operator option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    String,
    Url,
}

/// One operator option as presented to a user interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionDescriptor {
    pub name: &'static str,
    pub kind: OptionKind,
    pub value: String,
    pub help: &'static str,
}

/// Option names, kinds and help text, in presentation order.
const OPTIONS: [(&str, OptionKind, &str); 5] = [
    (
        "username",
        OptionKind::String,
        "Username for the authentication process",
    ),
    (
        "password",
        OptionKind::String,
        "Password for the authentication process",
    ),
    (
        "login_form_url",
        OptionKind::Url,
        "The URL where the login form appears",
    ),
    (
        "check_url",
        OptionKind::Url,
        "URL used to verify if the session is active. An HTTP GET request is sent \
         to this URL and the response is searched for `check_string`.",
    ),
    (
        "check_string",
        OptionKind::String,
        "String to search in the `check_url` page to determine if the session is active.",
    ),
];

/// Untyped operator options, exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOptions {
    pub username: String,
    pub password: String,
    pub login_form_url: String,
    pub check_url: String,
    pub check_string: String,
}

impl Default for RawOptions {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            login_form_url: DEFAULT_LOGIN_FORM_URL.to_string(),
            check_url: DEFAULT_CHECK_URL.to_string(),
            check_string: String::new(),
        }
    }
}

impl RawOptions {
    /// Current value of an option, `None` if the name is unknown.
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "username" => &self.username,
            "password" => &self.password,
            "login_form_url" => &self.login_form_url,
            "check_url" => &self.check_url,
            "check_string" => &self.check_string,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Set one option by name.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), ConfigError> {
        let slot = match name {
            "username" => &mut self.username,
            "password" => &mut self.password,
            "login_form_url" => &mut self.login_form_url,
            "check_url" => &mut self.check_url,
            "check_string" => &mut self.check_string,
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        };
        *slot = value.into();
        Ok(())
    }

    /// Apply a `name=value` override. Only the first `=` separates; the value
    /// may itself contain `=`.
    pub fn apply_override(&mut self, pair: &str) -> Result<(), ConfigError> {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| ConfigError::MalformedOverride(pair.to_string()))?;
        self.set(name.trim(), value)
    }

    /// Describe every option with its current value.
    pub fn descriptors(&self) -> Vec<OptionDescriptor> {
        OPTIONS
            .iter()
            .map(|&(name, kind, help)| OptionDescriptor {
                name,
                kind,
                value: self.get(name).unwrap_or_default().to_string(),
                help,
            })
            .collect()
    }

    /// Check that every option is present and well-formed.
    ///
    /// All empty options are reported together, in presentation order, so an
    /// operator can fix the configuration in one pass.
    pub fn validate(&self) -> Result<AutocompleteConfig, ConfigError> {
        let missing: Vec<String> = OPTIONS
            .iter()
            .map(|(name, _, _)| *name)
            .filter(|name| self.get(name).map_or(true, str::is_empty))
            .map(String::from)
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingOptions { missing });
        }

        let login_form_url = parse_url("login_form_url", &self.login_form_url)?;
        let check_url = parse_url("check_url", &self.check_url)?;

        Ok(AutocompleteConfig {
            credentials: Credentials {
                username: self.username.clone(),
                password: self.password.clone(),
            },
            endpoint: LoginEndpoint {
                login_form_url,
                check_url,
                check_string: self.check_string.clone(),
            },
        })
    }
}

fn parse_url(name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        name: name.to_string(),
        value: value.to_string(),
        source,
    })?;
    require_host(name, url)
}

/// Form actions are matched by host, so a URL without one can never match.
fn require_host(name: &str, url: Url) -> Result<Url, ConfigError> {
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl {
            name: name.to_string(),
            value: url.to_string(),
            source: url::ParseError::EmptyHost,
        });
    }
    Ok(url)
}

/// Username and password used to fill the login form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Both fields must be non-empty.
    pub fn new(username: &str, password: &str) -> Result<Self, ConfigError> {
        let missing: Vec<String> = [("username", username), ("password", password)]
            .iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(n, _)| n.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingOptions { missing });
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where the login form lives and how to tell that a session is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginEndpoint {
    login_form_url: Url,
    check_url: Url,
    check_string: String,
}

impl LoginEndpoint {
    /// `check_string` must be non-empty and both URLs must have a host.
    pub fn new(login_form_url: Url, check_url: Url, check_string: &str) -> Result<Self, ConfigError> {
        if check_string.is_empty() {
            return Err(ConfigError::MissingOptions {
                missing: vec!["check_string".to_string()],
            });
        }
        Ok(Self {
            login_form_url: require_host("login_form_url", login_form_url)?,
            check_url: require_host("check_url", check_url)?,
            check_string: check_string.to_string(),
        })
    }

    pub fn login_form_url(&self) -> &Url {
        &self.login_form_url
    }

    pub fn check_url(&self) -> &Url {
        &self.check_url
    }

    pub fn check_string(&self) -> &str {
        &self.check_string
    }

    /// Host of `login_form_url`; form actions must point at this domain.
    pub fn login_domain(&self) -> &str {
        self.login_form_url.host_str().unwrap_or_default()
    }
}

/// Validated configuration for one login orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteConfig {
    pub credentials: Credentials,
    pub endpoint: LoginEndpoint,
}

impl AutocompleteConfig {
    /// Convert back into the operator-facing representation.
    pub fn to_raw(&self) -> RawOptions {
        RawOptions {
            username: self.credentials.username.clone(),
            password: self.credentials.password.clone(),
            login_form_url: self.endpoint.login_form_url.to_string(),
            check_url: self.endpoint.check_url.to_string(),
            check_string: self.endpoint.check_string.clone(),
        }
    }

    /// Describe every option with its configured value.
    pub fn descriptors(&self) -> Vec<OptionDescriptor> {
        self.to_raw().descriptors()
    }
}

/// Settings for the bundled reqwest transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 15_000,
            user_agent: concat!("formauth/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl TransportConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// On-disk JSON configuration: the operator options plus transport settings.
///
/// ```json
/// {
///   "username": "alice",
///   "password": "s3cret",
///   "login_form_url": "https://app.example.com/login",
///   "check_url": "https://app.example.com/account",
///   "check_string": "Sign out",
///   "transport": { "timeout_ms": 10000 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(flatten)]
    pub options: RawOptions,
    #[serde(default)]
    pub transport: TransportConfig,
}

impl ConfigFile {
    /// Read and deserialize a config file. Options are not validated here.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> RawOptions {
        RawOptions {
            username: "alice".into(),
            password: "s3cret".into(),
            login_form_url: "http://host.tld/login".into(),
            check_url: "http://host.tld/check".into(),
            check_string: "Welcome back".into(),
        }
    }

    #[test]
    fn test_validate_complete_options() {
        let config = complete().validate().unwrap();
        assert_eq!(config.credentials.username(), "alice");
        assert_eq!(config.credentials.password(), "s3cret");
        assert_eq!(config.endpoint.login_domain(), "host.tld");
        assert_eq!(config.endpoint.check_string(), "Welcome back");
        assert_eq!(config.endpoint.check_url().as_str(), "http://host.tld/check");
    }

    #[test]
    fn test_empty_password_is_reported() {
        let mut raw = complete();
        raw.password.clear();

        let err = raw.validate().unwrap_err();
        assert_eq!(err.missing_options(), ["password".to_string()]);
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn test_defaults_report_every_empty_option_in_order() {
        let err = RawOptions::default().validate().unwrap_err();
        assert_eq!(
            err.missing_options(),
            ["username", "password", "check_string"].map(String::from)
        );
        assert!(err.to_string().ends_with("username, password, check_string"));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let mut raw = complete();
        raw.check_url = "not a url".into();

        match raw.validate() {
            Err(ConfigError::InvalidUrl { name, .. }) => assert_eq!(name, "check_url"),
            other => panic!("expected InvalidUrl, got {other:?}"),
        }
    }

    #[test]
    fn test_url_without_host_rejected() {
        let mut raw = complete();
        raw.login_form_url = "file:///srv/login.html".into();

        match raw.validate() {
            Err(ConfigError::InvalidUrl { name, source, .. }) => {
                assert_eq!(name, "login_form_url");
                assert_eq!(source, url::ParseError::EmptyHost);
            }
            other => panic!("expected InvalidUrl, got {other:?}"),
        }

        let endpoint = LoginEndpoint::new(
            Url::parse("http://host.tld/login").unwrap(),
            Url::parse("data:text/plain,hi").unwrap(),
            "Welcome back",
        );
        assert!(matches!(endpoint, Err(ConfigError::InvalidUrl { name, .. }) if name == "check_url"));
    }

    #[test]
    fn test_set_and_override() {
        let mut raw = RawOptions::default();
        raw.set("username", "bob").unwrap();
        raw.apply_override("check_string=a=b").unwrap();

        assert_eq!(raw.get("username"), Some("bob"));
        assert_eq!(raw.get("check_string"), Some("a=b"));
        assert!(matches!(
            raw.set("nope", "x"),
            Err(ConfigError::UnknownOption(name)) if name == "nope"
        ));
        assert!(matches!(
            raw.apply_override("username"),
            Err(ConfigError::MalformedOverride(_))
        ));
    }

    #[test]
    fn test_descriptors_follow_presentation_order() {
        let names: Vec<_> = RawOptions::default()
            .descriptors()
            .iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(
            names,
            ["username", "password", "login_form_url", "check_url", "check_string"]
        );

        let config = complete().validate().unwrap();
        let check = config
            .descriptors()
            .into_iter()
            .find(|d| d.name == "check_url")
            .unwrap();
        assert_eq!(check.kind, OptionKind::Url);
        assert_eq!(check.value, "http://host.tld/check");
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("alice", "hunter2").unwrap();
        let debug = format!("{creds:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_credentials_require_both_fields() {
        let err = Credentials::new("", "").unwrap_err();
        assert_eq!(err.missing_options(), ["username", "password"].map(String::from));
    }

    #[test]
    fn test_config_file_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");
        std::fs::write(
            &path,
            r#"{
                "username": "alice",
                "password": "s3cret",
                "login_form_url": "https://app.example.com/login",
                "check_url": "https://app.example.com/me",
                "check_string": "Sign out",
                "transport": { "timeout_ms": 2500 }
            }"#,
        )
        .unwrap();

        let file = ConfigFile::load(&path).unwrap();
        assert_eq!(file.transport.timeout(), Duration::from_millis(2500));
        let config = file.options.validate().unwrap();
        assert_eq!(config.endpoint.login_domain(), "app.example.com");
    }

    #[test]
    fn test_config_file_partial_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");
        std::fs::write(&path, r#"{ "username": "alice" }"#).unwrap();

        let file = ConfigFile::load(&path).unwrap();
        assert_eq!(file.options.login_form_url, DEFAULT_LOGIN_FORM_URL);
        assert_eq!(file.transport, TransportConfig::default());
    }

    #[test]
    fn test_config_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigFile::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
