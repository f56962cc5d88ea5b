//! HTML form extraction and login-form classification.
//!
//! The login workflow sees forms only through the [`FormDescriptor`]
//! capability trait and obtains them from a [`ParserFactory`]. The bundled
//! implementation scrapes `<form>` elements with `scraper`, keeps every
//! submittable field (hidden CSRF tokens included) and marks which fields
//! carry the username and the password.

use crate::acquisition::http_client::HttpResponse;
use crate::error::ParseError;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use url::Url;

/// HTTP method declared by a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Get,
    Post,
}

/// Body encoding declared by a form's `enctype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEncoding {
    UrlEncoded,
    Multipart,
}

/// One submittable field of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// The `name` attribute.
    pub name: String,
    /// Lower-cased input type (`text`, `password`, `hidden`, `select`, ...).
    pub field_type: String,
    /// Value the browser would submit by default.
    pub value: String,
}

/// Read-only view of a parsed form.
pub trait FormDescriptor: Send + Sync + fmt::Debug {
    /// Whether the form looks like it submits credentials.
    fn is_login_form(&self) -> bool;

    /// Absolute URL the form submits to.
    fn action(&self) -> &Url;

    fn method(&self) -> FormMethod;

    fn encoding(&self) -> FormEncoding;

    /// Every submittable field, in document order.
    fn fields(&self) -> &[FormField];

    /// Name of the field that receives the username, if one was recognised.
    fn username_field(&self) -> Option<&str>;

    /// Name of the field that receives the password, if one was recognised.
    fn password_field(&self) -> Option<&str>;
}

/// Parsed document that can enumerate its forms.
pub trait DocumentParser: Send {
    /// Forms in document order.
    fn forms(&self) -> Vec<Box<dyn FormDescriptor>>;
}

/// Picks a document parser for a response.
pub trait ParserFactory: Send + Sync {
    fn parser_for(&self, response: &HttpResponse) -> Result<Box<dyn DocumentParser>, ParseError>;
}

/// Parser factory for HTML and XHTML responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParserFactory;

impl ParserFactory for HtmlParserFactory {
    fn parser_for(&self, response: &HttpResponse) -> Result<Box<dyn DocumentParser>, ParseError> {
        // No content-type at all is treated as HTML.
        let is_html = response
            .content_type()
            .map(|ct| {
                let ct = ct.to_ascii_lowercase();
                ct.contains("text/html") || ct.contains("application/xhtml")
            })
            .unwrap_or(true);

        if !is_html {
            return Err(ParseError::Unavailable {
                url: response.url.to_string(),
                content_type: response.content_type().unwrap_or_default().to_string(),
            });
        }

        Ok(Box::new(HtmlDocumentParser::new(
            response.url.clone(),
            response.body.clone(),
        )))
    }
}

/// An HTML page waiting to be scraped for forms.
#[derive(Debug, Clone)]
pub struct HtmlDocumentParser {
    url: Url,
    html: String,
}

impl HtmlDocumentParser {
    pub fn new(url: Url, html: String) -> Self {
        Self { url, html }
    }
}

impl DocumentParser for HtmlDocumentParser {
    fn forms(&self) -> Vec<Box<dyn FormDescriptor>> {
        HtmlForm::parse_all(&self.html, &self.url)
            .into_iter()
            .map(|f| Box::new(f) as Box<dyn FormDescriptor>)
            .collect()
    }
}

/// A `<form>` scraped from an HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlForm {
    action: Url,
    method: FormMethod,
    encoding: FormEncoding,
    fields: Vec<FormField>,
    username_field: Option<String>,
    password_field: Option<String>,
    text_inputs: usize,
    password_inputs: usize,
}

impl HtmlForm {
    /// Parse every form in `html`, resolving actions against `base_url`.
    pub fn parse_all(html: &str, base_url: &Url) -> Vec<Self> {
        let document = Html::parse_document(html);
        let (Ok(form_sel), Ok(field_sel), Ok(option_sel)) = (
            Selector::parse("form"),
            Selector::parse("input, select, textarea"),
            Selector::parse("option"),
        ) else {
            return Vec::new();
        };

        document
            .select(&form_sel)
            .map(|form| Self::from_element(form, base_url, &field_sel, &option_sel))
            .collect()
    }

    fn from_element(
        form: ElementRef<'_>,
        base_url: &Url,
        field_sel: &Selector,
        option_sel: &Selector,
    ) -> Self {
        let attrs = form.value();

        let action = attrs
            .attr("action")
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .and_then(|a| base_url.join(a).ok())
            .unwrap_or_else(|| base_url.clone());

        let method = match attrs.attr("method") {
            Some(m) if m.trim().eq_ignore_ascii_case("post") => FormMethod::Post,
            _ => FormMethod::Get,
        };

        let encoding = match attrs.attr("enctype") {
            Some(e) if e.to_ascii_lowercase().contains("multipart/form-data") => {
                FormEncoding::Multipart
            }
            _ => FormEncoding::UrlEncoded,
        };

        let mut fields = Vec::new();
        let mut text_inputs = 0;
        let mut password_inputs = 0;

        for element in form.select(field_sel) {
            let el = element.value();
            let Some(name) = el.attr("name").filter(|n| !n.is_empty()) else {
                continue;
            };
            // Disabled controls are never submitted.
            if el.attr("disabled").is_some() {
                continue;
            }

            let (field_type, value) = match el.name() {
                "select" => ("select".to_string(), selected_option(element, option_sel)),
                "textarea" => ("textarea".to_string(), element.text().collect()),
                _ => {
                    let field_type = el
                        .attr("type")
                        .map(|t| t.trim().to_ascii_lowercase())
                        .unwrap_or_else(|| "text".to_string());
                    match field_type.as_str() {
                        "button" | "reset" | "image" => continue,
                        "checkbox" | "radio" if el.attr("checked").is_none() => continue,
                        _ => {}
                    }
                    let value = el.attr("value").unwrap_or_default().to_string();
                    (field_type, value)
                }
            };

            if is_text_type(&field_type) {
                text_inputs += 1;
            } else if field_type == "password" {
                password_inputs += 1;
            }

            fields.push(FormField {
                name: name.to_string(),
                field_type,
                value,
            });
        }

        let password_field = fields
            .iter()
            .find(|f| f.field_type == "password")
            .map(|f| f.name.clone());

        // Prefer a field whose name looks like a username; otherwise take the
        // first text field that is not a CSRF token.
        let username_field = fields
            .iter()
            .find(|f| is_text_type(&f.field_type) && is_username_field_name(&f.name))
            .or_else(|| {
                fields
                    .iter()
                    .find(|f| is_text_type(&f.field_type) && !is_csrf_field_name(&f.name))
            })
            .map(|f| f.name.clone());

        Self {
            action,
            method,
            encoding,
            fields,
            username_field,
            password_field,
            text_inputs,
            password_inputs,
        }
    }
}

impl FormDescriptor for HtmlForm {
    /// Exactly one password input and exactly one text input, and that
    /// input is usable as the username. Registration and password-change
    /// forms carry two or more password inputs; PIN and unlock forms carry
    /// no username at all.
    fn is_login_form(&self) -> bool {
        self.password_inputs == 1 && self.text_inputs == 1 && self.username_field.is_some()
    }

    fn action(&self) -> &Url {
        &self.action
    }

    fn method(&self) -> FormMethod {
        self.method
    }

    fn encoding(&self) -> FormEncoding {
        self.encoding
    }

    fn fields(&self) -> &[FormField] {
        &self.fields
    }

    fn username_field(&self) -> Option<&str> {
        self.username_field.as_deref()
    }

    fn password_field(&self) -> Option<&str> {
        self.password_field.as_deref()
    }
}

/// Value of the selected `<option>`, falling back to the first one.
fn selected_option(select: ElementRef<'_>, option_sel: &Selector) -> String {
    let option_value = |o: ElementRef<'_>| {
        o.value()
            .attr("value")
            .map(String::from)
            .unwrap_or_else(|| o.text().collect::<String>().trim().to_string())
    };

    select
        .select(option_sel)
        .find(|o| o.value().attr("selected").is_some())
        .or_else(|| select.select(option_sel).next())
        .map(option_value)
        .unwrap_or_default()
}

fn is_text_type(field_type: &str) -> bool {
    matches!(field_type, "text" | "email" | "tel")
}

/// Check if a field name looks like a username/email field.
fn is_username_field_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("user")
        || lower.contains("email")
        || lower.contains("login")
        || lower.contains("account")
        || lower == "id"
        || lower == "name"
}

/// Check if a field name looks like a CSRF token.
fn is_csrf_field_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("csrf")
        || lower.contains("_token")
        || lower == "authenticity_token"
        || lower.contains("nonce")
        || lower.contains("xsrf")
}
