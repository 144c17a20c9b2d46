//! Mutable accumulators for request configuration and the last response.
//!
//! # Design
//! `RequestState` buffers everything the builder's chained setters produce;
//! nothing here touches the transport. Headers live in a `Vec` so insertion
//! order survives into test assertions, with `put_header` keeping keys
//! unique by overwriting in place. URI and path strings pass through
//! verbatim; the transport surfaces malformed-URL errors at send time.

use crate::http::ContentType;

/// Staged request configuration, buffered until `RequestBuilder::build`.
#[derive(Debug, Clone, Default)]
pub struct RequestState {
    body: Option<String>,
    base_uri: Option<String>,
    base_path: String,
    content_type: Option<ContentType>,
    headers: Vec<(String, String)>,
}

impl RequestState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the base URI unconditionally.
    pub fn set_base_uri(&mut self, uri: &str) {
        self.base_uri = Some(uri.to_string());
    }

    /// Concatenate `fragment` onto the current base URI. No separator is
    /// inserted.
    ///
    /// # Panics
    /// Panics if no base URI has been set; appending to nothing is a
    /// call-ordering bug, not a recoverable condition.
    pub fn append_base_uri(&mut self, fragment: &str) {
        match self.base_uri.as_mut() {
            Some(base) => base.push_str(fragment),
            None => panic!("base URI must be set before appending to it"),
        }
    }

    /// Replace the base path unconditionally.
    pub fn set_base_path(&mut self, path: &str) {
        self.base_path = path.to_string();
    }

    /// Concatenate `fragment` onto the current base path. The path starts
    /// out empty, so appending is always defined.
    pub fn append_base_path(&mut self, fragment: &str) {
        self.base_path.push_str(fragment);
    }

    /// Set a header, overwriting any existing value for the same name while
    /// keeping its original position.
    pub fn put_header(&mut self, name: &str, value: &str) {
        match self.headers.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Merge a batch of headers; incoming entries win on name collisions.
    pub fn put_headers<K, V, I>(&mut self, entries: I)
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (name, value) in entries {
            self.put_header(&name.into(), &value.into());
        }
    }

    pub fn set_content_type(&mut self, content_type: ContentType) {
        self.content_type = Some(content_type);
    }

    /// Stage an already-serialized payload.
    pub fn set_body(&mut self, body: String) {
        self.body = Some(body);
    }

    pub fn base_uri(&self) -> Option<&str> {
        self.base_uri.as_deref()
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn content_type(&self) -> Option<ContentType> {
        self.content_type
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

/// Outcome of the most recent send. Overwritten on every send; no history
/// is retained.
///
/// `status_code` and `body` are only meaningful when `error` is `None`; a
/// transport failure records only `error`.
#[derive(Debug, Clone)]
pub struct ResponseState {
    pub body: String,
    pub status_code: u16,
    pub error: Option<String>,
}
