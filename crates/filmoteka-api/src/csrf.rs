//! Anti-forgery token lookup.
//!
//! The server issues the token in a cookie, and also embeds it in rendered
//! forms. Either source works for `X-CSRFToken`.

use std::sync::OnceLock;

use regex::Regex;

/// Name of the hidden input carrying the token in rendered forms.
pub const FORM_FIELD: &str = "csrfmiddlewaretoken";

/// Where the client finds its anti-forgery token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsrfSource {
    /// Read the named cookie from the session's cookie header.
    Cookie(String),
    /// A value lifted from an embedded form field.
    FormField(Option<String>),
}

impl CsrfSource {
    /// Build a form-field source by scanning rendered page markup.
    pub fn from_form_html(html: &str) -> Self {
        Self::FormField(form_field_value(html))
    }

    pub fn token(&self, cookie_header: Option<&str>) -> Option<String> {
        match self {
            Self::Cookie(name) => cookie_header.and_then(|h| cookie_value(h, name)),
            Self::FormField(value) => value.clone().filter(|v| !v.is_empty()),
        }
    }
}

/// Find a cookie in a `Cookie:` header string, percent-decoded.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .filter(|pair| pair.starts_with(name) && pair[name.len()..].starts_with('='))
        .flat_map(|pair| url::form_urlencoded::parse(pair.as_bytes()))
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Extract the value of the hidden CSRF input from page markup.
pub fn form_field_value(html: &str) -> Option<String> {
    static INPUT: OnceLock<Regex> = OnceLock::new();
    static VALUE: OnceLock<Regex> = OnceLock::new();

    let input = INPUT.get_or_init(|| {
        Regex::new(r#"<input[^>]*name=["']csrfmiddlewaretoken["'][^>]*>"#)
            .expect("valid csrf input pattern")
    });
    let value = VALUE.get_or_init(|| {
        Regex::new(r#"value=["']([^"']*)["']"#).expect("valid csrf value pattern")
    });

    let tag = input.find(html)?;
    value
        .captures(tag.as_str())
        .map(|c| c[1].to_string())
        .filter(|v| !v.is_empty())
}
