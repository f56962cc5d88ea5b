//! HTTP transport for the login workflow.
//!
//! The workflow only depends on the [`HttpTransport`] trait. [`ReqwestTransport`]
//! is the bundled implementation: rustls, one cookie jar shared by every
//! request, and a redirect policy chosen per call.

use crate::acquisition::form_parser::{FormEncoding, FormMethod};
use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::login::filler::FilledForm;
use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder};
use std::sync::Arc;
use url::Url;

/// Maximum redirects followed when `follow_redirects` is set.
const MAX_REDIRECTS: usize = 10;

/// Per-request flags understood by a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    /// Let the host's passive analysis inspect the response.
    pub grep: bool,
    /// Allow a cached response to be served.
    pub cache: bool,
    pub follow_redirects: bool,
}

impl RequestOptions {
    /// Flags for every request issued by the login workflow.
    pub const LOGIN: Self = Self {
        grep: false,
        cache: false,
        follow_redirects: true,
    };
}

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Final URL after any redirects.
    pub url: Url,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn body(&self) -> &str {
        &self.body
    }

    /// First header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }
}

/// Issues the requests the login workflow needs.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// HTTP GET `url`.
    async fn get(&self, url: &Url, options: RequestOptions) -> Result<HttpResponse, TransportError>;

    /// Submit a filled form to its action URL using the form's method and
    /// encoding.
    async fn send(
        &self,
        form: &FilledForm,
        options: RequestOptions,
    ) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn get(&self, url: &Url, options: RequestOptions) -> Result<HttpResponse, TransportError> {
        (**self).get(url, options).await
    }

    async fn send(
        &self,
        form: &FilledForm,
        options: RequestOptions,
    ) -> Result<HttpResponse, TransportError> {
        (**self).send(form, options).await
    }
}

/// [`HttpTransport`] backed by `reqwest`.
///
/// reqwest fixes the redirect policy per client, so two clients are kept,
/// one following redirects and one not. Both share a cookie jar, which means
/// the session cookies set by the login POST are sent on the check request.
/// This transport never analyses responses, so `grep` has no effect here.
pub struct ReqwestTransport {
    following: Client,
    direct: Client,
    jar: Arc<Jar>,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let jar = Arc::new(Jar::default());

        let build = |policy: Policy| {
            Client::builder()
                .cookie_provider(jar.clone())
                .redirect(policy)
                .timeout(config.timeout())
                .user_agent(config.user_agent.as_str())
                .build()
                .map_err(|e| TransportError::Client(e.to_string()))
        };

        let following = build(Policy::limited(MAX_REDIRECTS))?;
        let direct = build(Policy::none())?;

        Ok(Self {
            following,
            direct,
            jar,
        })
    }

    /// The cookie jar shared by every request, for hosts that want to reuse
    /// the authenticated session.
    pub fn cookie_jar(&self) -> Arc<Jar> {
        self.jar.clone()
    }

    fn client(&self, options: RequestOptions) -> &Client {
        if options.follow_redirects {
            &self.following
        } else {
            &self.direct
        }
    }

    async fn execute(
        &self,
        url: &Url,
        builder: RequestBuilder,
        options: RequestOptions,
    ) -> Result<HttpResponse, TransportError> {
        let builder = if options.cache {
            builder
        } else {
            builder
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache")
        };

        let response = builder.send().await.map_err(|e| TransportError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let final_url = response.url().clone();
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();

        let body = response.text().await.map_err(|e| TransportError::Body {
            url: final_url.to_string(),
            message: e.to_string(),
        })?;

        tracing::trace!(target: "formauth", url = %final_url, status, "response received");

        Ok(HttpResponse {
            url: final_url,
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url, options: RequestOptions) -> Result<HttpResponse, TransportError> {
        let builder = self.client(options).get(url.clone());
        self.execute(url, builder, options).await
    }

    async fn send(
        &self,
        form: &FilledForm,
        options: RequestOptions,
    ) -> Result<HttpResponse, TransportError> {
        let client = self.client(options);
        let action = form.action();

        let builder = match (form.method(), form.encoding()) {
            (FormMethod::Get, _) => {
                // The form data replaces any query already on the action.
                let mut url = action.clone();
                url.set_query(None);
                if !form.pairs().is_empty() {
                    let mut query = url.query_pairs_mut();
                    for (name, value) in form.pairs() {
                        query.append_pair(name, value);
                    }
                }
                client.get(url)
            }
            (FormMethod::Post, FormEncoding::UrlEncoded) => {
                client.post(action.clone()).form(form.pairs())
            }
            (FormMethod::Post, FormEncoding::Multipart) => {
                let multipart = form
                    .pairs()
                    .iter()
                    .fold(reqwest::multipart::Form::new(), |acc, (name, value)| {
                        acc.text(name.clone(), value.clone())
                    });
                client.post(action.clone()).multipart(multipart)
            }
        };

        self.execute(action, builder, options).await
    }
}
