//! Credential filling: turn a selected form into a submittable payload.

use crate::acquisition::form_parser::{FormDescriptor, FormEncoding, FormMethod};
use crate::config::Credentials;
use crate::error::FillError;
use url::Url;

/// A form copied out of its descriptor, ready to be sent.
///
/// Field order follows the source form. Hidden fields such as CSRF tokens
/// keep the value the page gave them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilledForm {
    action: Url,
    method: FormMethod,
    encoding: FormEncoding,
    pairs: Vec<(String, String)>,
    username_field: Option<String>,
    password_field: Option<String>,
}

impl FilledForm {
    /// Copy a descriptor's target, encoding and default field values.
    pub fn from_descriptor(form: &dyn FormDescriptor) -> Self {
        Self {
            action: form.action().clone(),
            method: form.method(),
            encoding: form.encoding(),
            pairs: form
                .fields()
                .iter()
                .map(|f| (f.name.clone(), f.value.clone()))
                .collect(),
            username_field: form.username_field().map(String::from),
            password_field: form.password_field().map(String::from),
        }
    }

    pub fn set_login_username(&mut self, username: &str) -> Result<(), FillError> {
        let name = self
            .username_field
            .clone()
            .ok_or_else(|| FillError::MissingUsernameField {
                action: self.action.to_string(),
            })?;
        self.set(&name, username);
        Ok(())
    }

    pub fn set_login_password(&mut self, password: &str) -> Result<(), FillError> {
        let name = self
            .password_field
            .clone()
            .ok_or_else(|| FillError::MissingPasswordField {
                action: self.action.to_string(),
            })?;
        self.set(&name, password);
        Ok(())
    }

    /// Overwrite every pair named `name`, appending one if none exists.
    fn set(&mut self, name: &str, value: &str) {
        let mut found = false;
        for (_, v) in self.pairs.iter_mut().filter(|(k, _)| k == name) {
            *v = value.to_string();
            found = true;
        }
        if !found {
            self.pairs.push((name.to_string(), value.to_string()));
        }
    }

    pub fn action(&self) -> &Url {
        &self.action
    }

    pub fn method(&self) -> FormMethod {
        self.method
    }

    pub fn encoding(&self) -> FormEncoding {
        self.encoding
    }

    /// Name/value pairs in submission order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Value of the first pair named `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Copy `form` and populate its username and password fields.
pub fn fill(form: &dyn FormDescriptor, credentials: &Credentials) -> Result<FilledForm, FillError> {
    let mut filled = FilledForm::from_descriptor(form);
    filled.set_login_username(credentials.username())?;
    filled.set_login_password(credentials.password())?;
    Ok(filled)
}
