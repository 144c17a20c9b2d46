//! Plain-data vocabulary shared between the builder and its transport.
//!
//! # Design
//! The builder never talks to the network itself. Everything it hands a
//! transport is plain data: a method, a content type, header pairs, an
//! endpoint template with positional parameters. The `Transport` trait is
//! the whole collaborator contract, so tests can substitute a recording
//! double for the real ureq-backed implementation.

use crate::error::ClientError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
        }
    }
}

/// Content type of the staged request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
    Xml,
    Text,
    UrlEncoded,
}

impl ContentType {
    /// The MIME string sent on the wire.
    pub fn mime(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::Xml => "application/xml",
            ContentType::Text => "text/plain",
            ContentType::UrlEncoded => "application/x-www-form-urlencoded",
        }
    }
}

/// Outcome of one completed HTTP exchange as plain data. Any status code
/// counts as completed, 4xx/5xx included.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// The collaborator that actually talks HTTP.
///
/// Staged configuration arrives through the `set_*` methods — pushed by
/// `RequestBuilder::build`, except `set_basic_auth` which the builder applies
/// eagerly. `execute` then performs one blocking exchange against the
/// configured target, optionally extended by an endpoint template whose
/// `{placeholder}` segments are filled from `params` positionally.
pub trait Transport: Send {
    fn set_target_url(&mut self, url: &str);
    fn set_header(&mut self, name: &str, value: &str);
    fn set_content_type(&mut self, content_type: ContentType);
    fn set_basic_auth(&mut self, username: &str, password: &str);

    /// Perform one exchange. Blocks until the transport has a status and a
    /// body, or fails to complete the exchange entirely.
    fn execute(
        &mut self,
        method: HttpMethod,
        endpoint: Option<&str>,
        params: &[&str],
        body: Option<&str>,
    ) -> Result<TransportResponse, ClientError>;
}

/// Substitute positional parameters into `{placeholder}` segments, left to
/// right. Extra parameters are ignored; placeholders without a parameter are
/// left verbatim.
pub fn expand_path(endpoint: &str, params: &[&str]) -> String {
    let mut path = endpoint.to_string();
    for param in params {
        let Some(start) = path.find('{') else { break };
        let Some(len) = path[start..].find('}') else { break };
        path.replace_range(start..=start + len, param);
    }
    path
}

/// Render a response body for inspection: JSON documents are pretty-printed,
/// anything else passes through untouched.
pub(crate) fn pretty_body(raw: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}
