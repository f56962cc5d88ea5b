//! Test doubles shared by the login module tests.

use crate::acquisition::form_parser::{
    DocumentParser, FormDescriptor, FormEncoding, FormField, FormMethod, ParserFactory,
};
use crate::acquisition::http_client::{HttpResponse, HttpTransport, RequestOptions};
use crate::error::{ParseError, TransportError};
use crate::login::filler::FilledForm;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

/// Hand-built form descriptor.
#[derive(Debug, Clone)]
pub(crate) struct StubForm {
    login: bool,
    action: Url,
    fields: Vec<FormField>,
    username: Option<&'static str>,
}

impl StubForm {
    pub(crate) fn login(action: &str) -> Self {
        Self {
            login: true,
            action: Url::parse(action).unwrap(),
            fields: vec![
                FormField {
                    name: "user".into(),
                    field_type: "text".into(),
                    value: String::new(),
                },
                FormField {
                    name: "pass".into(),
                    field_type: "password".into(),
                    value: String::new(),
                },
            ],
            username: Some("user"),
        }
    }

    /// Claims to be a login form but exposes no username field.
    pub(crate) fn without_username(action: &str) -> Self {
        Self {
            username: None,
            ..Self::login(action)
        }
    }

    pub(crate) fn other(action: &str) -> Self {
        Self {
            login: false,
            action: Url::parse(action).unwrap(),
            fields: Vec::new(),
            username: None,
        }
    }
}

impl FormDescriptor for StubForm {
    fn is_login_form(&self) -> bool {
        self.login
    }

    fn action(&self) -> &Url {
        &self.action
    }

    fn method(&self) -> FormMethod {
        FormMethod::Post
    }

    fn encoding(&self) -> FormEncoding {
        FormEncoding::UrlEncoded
    }

    fn fields(&self) -> &[FormField] {
        &self.fields
    }

    fn username_field(&self) -> Option<&str> {
        self.username
    }

    fn password_field(&self) -> Option<&str> {
        self.login.then_some("pass")
    }
}

/// Parser factory that hands out the same stub forms for every page.
#[derive(Debug, Clone)]
pub(crate) struct StubParsers(pub(crate) Vec<StubForm>);

impl ParserFactory for StubParsers {
    fn parser_for(&self, _response: &HttpResponse) -> Result<Box<dyn DocumentParser>, ParseError> {
        Ok(Box::new(self.clone()))
    }
}

impl DocumentParser for StubParsers {
    fn forms(&self) -> Vec<Box<dyn FormDescriptor>> {
        self.0
            .iter()
            .cloned()
            .map(|f| Box::new(f) as Box<dyn FormDescriptor>)
            .collect()
    }
}

#[derive(Debug, Clone)]
enum Call {
    Get(String, RequestOptions),
    Send(FilledForm, RequestOptions),
}

/// Scripted transport: GETs are answered from registered pages (anything
/// else is a transport error), submissions answer with a fixed status.
#[derive(Debug)]
pub(crate) struct MockTransport {
    pages: HashMap<String, (Option<String>, String)>,
    submit_status: Option<u16>,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self {
            pages: HashMap::new(),
            submit_status: Some(302),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_page(self, url: &str, body: &str) -> Self {
        self.with_typed_page(url, "text/html; charset=utf-8", body)
    }

    pub(crate) fn with_typed_page(mut self, url: &str, content_type: &str, body: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            (Some(content_type.to_string()), body.to_string()),
        );
        self
    }

    pub(crate) fn with_submit_status(mut self, status: u16) -> Self {
        self.submit_status = Some(status);
        self
    }

    pub(crate) fn failing_submit(mut self) -> Self {
        self.submit_status = None;
        self
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// URLs fetched with GET, in order.
    pub(crate) fn gets(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                Call::Get(url, _) => Some(url.clone()),
                Call::Send(..) => None,
            })
            .collect()
    }

    pub(crate) fn sent_forms(&self) -> Vec<FilledForm> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                Call::Send(form, _) => Some(form.clone()),
                Call::Get(..) => None,
            })
            .collect()
    }

    pub(crate) fn options_seen(&self) -> Vec<RequestOptions> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| match c {
                Call::Get(_, o) | Call::Send(_, o) => *o,
            })
            .collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, url: &Url, options: RequestOptions) -> Result<HttpResponse, TransportError> {
        self.record(Call::Get(url.to_string(), options));

        let (content_type, body) =
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| TransportError::Request {
                    url: url.to_string(),
                    message: "connection refused".to_string(),
                })?;

        Ok(HttpResponse {
            url: url.clone(),
            status: 200,
            headers: content_type
                .map(|ct| vec![("content-type".to_string(), ct)])
                .unwrap_or_default(),
            body,
        })
    }

    async fn send(
        &self,
        form: &FilledForm,
        options: RequestOptions,
    ) -> Result<HttpResponse, TransportError> {
        self.record(Call::Send(form.clone(), options));

        let status = self.submit_status.ok_or_else(|| TransportError::Request {
            url: form.action().to_string(),
            message: "operation timed out".to_string(),
        })?;

        Ok(HttpResponse {
            url: form.action().clone(),
            status,
            headers: Vec::new(),
            body: String::new(),
        })
    }
}
