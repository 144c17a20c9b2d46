//! The fluent request builder.
//!
//! # Design
//! Two mutation classes, kept explicit. Staged changes (base URI, base path,
//! headers, content type, body) buffer into `RequestState` and reach the
//! transport only when `build` runs. Immediate changes — `set_basic_auth`
//! alone — configure the transport on the spot, because credentials are
//! transport-level configuration rather than part of the URL/header/body
//! bundle. `send` refuses to run before `build` so a request can never go
//! out with an undefined target.

use serde::Serialize;

use crate::error::ClientError;
use crate::http::{pretty_body, ContentType, HttpMethod, Transport};
use crate::state::{RequestState, ResponseState};
use crate::transport::UreqTransport;

/// Fluent façade over a [`Transport`].
///
/// Configuration methods return `&mut Self` so calls chain on one mutable
/// instance. A builder owns exactly one `RequestState` for its lifetime and,
/// after the first send, one `ResponseState`, replaced on each later send.
/// Not intended for concurrent mutation from multiple threads; give each
/// execution context its own builder (see [`crate::registry`]).
pub struct RequestBuilder {
    state: RequestState,
    transport: Box<dyn Transport>,
    response: Option<ResponseState>,
    built: bool,
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("state", &self.state)
            .field("response", &self.response)
            .field("built", &self.built)
            .finish_non_exhaustive()
    }
}

impl RequestBuilder {
    /// Create a builder backed by the real ureq transport. `log` enables
    /// full request/response detail at debug level.
    pub fn new(log: bool) -> Self {
        Self::with_transport(Box::new(UreqTransport::new(log)))
    }

    /// Create a builder over any transport, e.g. a test double.
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            state: RequestState::new(),
            transport,
            response: None,
            built: false,
        }
    }

    pub fn set_base_uri(&mut self, uri: &str) -> &mut Self {
        self.state.set_base_uri(uri);
        self
    }

    /// Concatenate `fragment` onto the staged base URI.
    ///
    /// # Panics
    /// Panics if no base URI has been set.
    pub fn append_to_base_uri(&mut self, fragment: &str) -> &mut Self {
        self.state.append_base_uri(fragment);
        self
    }

    pub fn set_base_path(&mut self, path: &str) -> &mut Self {
        self.state.set_base_path(path);
        self
    }

    pub fn append_to_base_path(&mut self, fragment: &str) -> &mut Self {
        self.state.append_base_path(fragment);
        self
    }

    /// Stage a header; a later write to the same name overwrites the value.
    pub fn add_header(&mut self, name: &str, value: &str) -> &mut Self {
        self.state.put_header(name, value);
        self
    }

    /// Stage a batch of headers; incoming entries win on name collisions.
    pub fn add_headers<K, V, I>(&mut self, headers: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.state.put_headers(headers);
        self
    }

    pub fn set_content_type(&mut self, content_type: ContentType) -> &mut Self {
        self.state.set_content_type(content_type);
        self
    }

    /// Stage a pre-serialized payload verbatim.
    pub fn set_raw_body(&mut self, body: impl Into<String>) -> &mut Self {
        self.state.set_body(body.into());
        self
    }

    /// Serialize `body` to JSON text and stage it.
    pub fn set_body<T: Serialize>(&mut self, body: &T) -> Result<&mut Self, ClientError> {
        let text =
            serde_json::to_string(body).map_err(|e| ClientError::Serialization(e.to_string()))?;
        self.state.set_body(text);
        Ok(self)
    }

    /// Immediate: configure credentials on the transport right away, before
    /// any `build` or `send`. The single setter that bypasses staging.
    pub fn set_basic_auth(&mut self, username: &str, password: &str) -> &mut Self {
        self.transport.set_basic_auth(username, password);
        self
    }

    /// Push the staged configuration to the transport, in a fixed order:
    /// target URL assembled from base URI + base path, then every header,
    /// then the content type (JSON when none was chosen).
    ///
    /// # Panics
    /// Panics if no base URI has been set.
    pub fn build(&mut self) -> &mut Self {
        let target = match self.state.base_uri() {
            Some(base_uri) => format!("{base_uri}{}", self.state.base_path()),
            None => panic!("base URI must be set before build"),
        };
        self.transport.set_target_url(&target);
        for (name, value) in self.state.headers() {
            self.transport.set_header(name, value);
        }
        let content_type = self.state.content_type().unwrap_or(ContentType::Json);
        self.state.set_content_type(content_type);
        self.transport.set_content_type(content_type);
        self.built = true;
        self
    }

    /// Execute one blocking exchange via the transport.
    ///
    /// `endpoint`, when present, extends the built target URL; `params` fill
    /// its `{placeholder}` segments positionally. Any HTTP status — 4xx and
    /// 5xx included — is a normal outcome recorded in the response state;
    /// only a failure to complete the exchange returns `Err`, which also
    /// leaves a response state carrying the error text.
    pub fn send(
        &mut self,
        method: HttpMethod,
        endpoint: Option<&str>,
        params: &[&str],
    ) -> Result<&mut Self, ClientError> {
        if !self.built {
            return Err(ClientError::NotBuilt);
        }
        match self
            .transport
            .execute(method, endpoint, params, self.state.body())
        {
            Ok(outcome) => {
                self.response = Some(ResponseState {
                    body: pretty_body(&outcome.body),
                    status_code: outcome.status,
                    error: None,
                });
                Ok(self)
            }
            Err(err) => {
                self.response = Some(ResponseState {
                    body: String::new(),
                    status_code: 0,
                    error: Some(err.to_string()),
                });
                Err(err)
            }
        }
    }

    /// Like [`send`](Self::send), but converts any status other than
    /// `expected` into [`ClientError::UnexpectedStatus`]. The narrow helper
    /// for call sites that require a specific outcome, e.g. "this GET must
    /// return 200".
    pub fn send_expecting(
        &mut self,
        method: HttpMethod,
        endpoint: Option<&str>,
        params: &[&str],
        expected: u16,
    ) -> Result<&mut Self, ClientError> {
        self.send(method, endpoint, params)?;
        let actual = self.status_code();
        if actual != expected {
            return Err(ClientError::UnexpectedStatus {
                expected,
                actual,
                body: self.response_body().to_string(),
            });
        }
        Ok(self)
    }

    /// Status code of the most recent exchange.
    ///
    /// # Panics
    /// Panics if no send has completed successfully yet.
    pub fn status_code(&self) -> u16 {
        match &self.response {
            Some(response) if response.error.is_none() => response.status_code,
            _ => panic!("no response: status_code read before a successful send"),
        }
    }

    /// Pretty-rendered body of the most recent exchange.
    ///
    /// # Panics
    /// Panics if no send has completed successfully yet.
    pub fn response_body(&self) -> &str {
        match &self.response {
            Some(response) if response.error.is_none() => &response.body,
            _ => panic!("no response: body read before a successful send"),
        }
    }

    /// Non-panicking view of the last response state, if any send ran.
    pub fn response(&self) -> Option<&ResponseState> {
        self.response.as_ref()
    }

    /// The staged configuration. Mainly useful to tests and diagnostics.
    pub fn request(&self) -> &RequestState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::http::TransportResponse;

    #[derive(Debug, Default)]
    struct Seen {
        target_url: Option<String>,
        headers: Vec<(String, String)>,
        content_type: Option<ContentType>,
        basic_auth: Option<(String, String)>,
        executions: Vec<Execution>,
    }

    #[derive(Debug)]
    struct Execution {
        method: HttpMethod,
        endpoint: Option<String>,
        params: Vec<String>,
        body: Option<String>,
    }

    /// Test double: records every applied setting and execution, and answers
    /// with a canned response (or a transport failure when `respond_with` is
    /// `None`).
    struct RecordingTransport {
        seen: Arc<Mutex<Seen>>,
        respond_with: Option<TransportResponse>,
    }

    impl Transport for RecordingTransport {
        fn set_target_url(&mut self, url: &str) {
            self.seen.lock().unwrap().target_url = Some(url.to_string());
        }

        fn set_header(&mut self, name: &str, value: &str) {
            self.seen
                .lock()
                .unwrap()
                .headers
                .push((name.to_string(), value.to_string()));
        }

        fn set_content_type(&mut self, content_type: ContentType) {
            self.seen.lock().unwrap().content_type = Some(content_type);
        }

        fn set_basic_auth(&mut self, username: &str, password: &str) {
            self.seen.lock().unwrap().basic_auth =
                Some((username.to_string(), password.to_string()));
        }

        fn execute(
            &mut self,
            method: HttpMethod,
            endpoint: Option<&str>,
            params: &[&str],
            body: Option<&str>,
        ) -> Result<TransportResponse, ClientError> {
            self.seen.lock().unwrap().executions.push(Execution {
                method,
                endpoint: endpoint.map(str::to_string),
                params: params.iter().map(|p| p.to_string()).collect(),
                body: body.map(str::to_string),
            });
            match &self.respond_with {
                Some(response) => Ok(response.clone()),
                None => Err(ClientError::Transport("connection refused".to_string())),
            }
        }
    }

    fn recording_builder(
        respond_with: Option<TransportResponse>,
    ) -> (Arc<Mutex<Seen>>, RequestBuilder) {
        let seen = Arc::new(Mutex::new(Seen::default()));
        let transport = RecordingTransport {
            seen: seen.clone(),
            respond_with,
        };
        (seen, RequestBuilder::with_transport(Box::new(transport)))
    }

    fn ok_builder() -> (Arc<Mutex<Seen>>, RequestBuilder) {
        recording_builder(Some(TransportResponse {
            status: 200,
            body: "{}".to_string(),
        }))
    }

    #[test]
    fn round_trip_configuration_reaches_transport() {
        let (seen, mut builder) = ok_builder();
        builder
            .set_base_uri("https://api.example.com")
            .set_base_path("/v1")
            .add_header("Accept", "application/json")
            .build()
            .send(HttpMethod::Get, Some("/users/{id}"), &["42"])
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.target_url.as_deref(), Some("https://api.example.com/v1"));
        assert_eq!(
            seen.headers,
            vec![("Accept".to_string(), "application/json".to_string())]
        );
        assert_eq!(seen.content_type, Some(ContentType::Json));
        assert_eq!(seen.executions.len(), 1);
        let execution = &seen.executions[0];
        assert_eq!(execution.method, HttpMethod::Get);
        assert_eq!(execution.endpoint.as_deref(), Some("/users/{id}"));
        assert_eq!(execution.params, vec!["42".to_string()]);
        assert!(execution.body.is_none());
    }

    #[test]
    fn content_type_defaults_to_json_at_build() {
        let (seen, mut builder) = ok_builder();
        builder.set_base_uri("http://localhost").build();
        assert_eq!(seen.lock().unwrap().content_type, Some(ContentType::Json));
    }

    #[test]
    fn explicit_content_type_survives_build() {
        let (seen, mut builder) = ok_builder();
        builder
            .set_base_uri("http://localhost")
            .set_content_type(ContentType::Xml)
            .build();
        assert_eq!(seen.lock().unwrap().content_type, Some(ContentType::Xml));
    }

    #[test]
    fn send_before_build_is_an_error() {
        let (seen, mut builder) = ok_builder();
        builder.set_base_uri("http://localhost");
        let err = builder.send(HttpMethod::Get, None, &[]).unwrap_err();
        assert!(matches!(err, ClientError::NotBuilt));
        assert!(seen.lock().unwrap().executions.is_empty());
    }

    #[test]
    #[should_panic(expected = "base URI must be set before build")]
    fn build_without_base_uri_panics() {
        let (_seen, mut builder) = ok_builder();
        builder.build();
    }

    #[test]
    fn basic_auth_applies_immediately() {
        let (seen, mut builder) = ok_builder();
        builder.set_basic_auth("bob", "secret");

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen.basic_auth,
            Some(("bob".to_string(), "secret".to_string()))
        );
        // Nothing staged has been applied yet: auth is the only eager setter.
        assert!(seen.target_url.is_none());
        assert!(seen.headers.is_empty());
    }

    #[test]
    fn header_collision_last_write_wins() {
        let (seen, mut builder) = ok_builder();
        builder
            .set_base_uri("http://localhost")
            .add_header("Accept", "text/plain")
            .add_headers(vec![("Accept", "application/json")])
            .build();
        assert_eq!(
            seen.lock().unwrap().headers,
            vec![("Accept".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn append_setters_concatenate_without_separator() {
        let (seen, mut builder) = ok_builder();
        builder
            .set_base_uri("https://api")
            .append_to_base_uri(".example.com")
            .set_base_path("/v1")
            .append_to_base_path("/beta")
            .build();
        assert_eq!(
            seen.lock().unwrap().target_url.as_deref(),
            Some("https://api.example.com/v1/beta")
        );
    }

    #[test]
    fn staged_body_is_passed_to_execute() {
        #[derive(Serialize)]
        struct Payload {
            name: &'static str,
        }

        let (seen, mut builder) = ok_builder();
        builder.set_base_uri("http://localhost");
        builder
            .set_body(&Payload { name: "ada" })
            .unwrap()
            .build()
            .send(HttpMethod::Post, None, &[])
            .unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(
            seen.executions[0].body.as_deref(),
            Some(r#"{"name":"ada"}"#)
        );
    }

    #[test]
    fn raw_body_is_staged_verbatim() {
        let (seen, mut builder) = ok_builder();
        builder
            .set_base_uri("http://localhost")
            .set_raw_body("a=1&b=2")
            .set_content_type(ContentType::UrlEncoded)
            .build()
            .send(HttpMethod::Post, None, &[])
            .unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(seen.executions[0].body.as_deref(), Some("a=1&b=2"));
        assert_eq!(seen.content_type, Some(ContentType::UrlEncoded));
    }

    #[test]
    fn send_records_pretty_response() {
        let (_seen, mut builder) = recording_builder(Some(TransportResponse {
            status: 201,
            body: r#"{"id":7}"#.to_string(),
        }));
        builder
            .set_base_uri("http://localhost")
            .build()
            .send(HttpMethod::Post, None, &[])
            .unwrap();
        assert_eq!(builder.status_code(), 201);
        assert_eq!(builder.response_body(), "{\n  \"id\": 7\n}");
    }

    #[test]
    fn each_send_replaces_previous_response() {
        let (seen, mut builder) = ok_builder();
        builder.set_base_uri("http://localhost").build();
        builder.send(HttpMethod::Get, Some("/a"), &[]).unwrap();
        builder.send(HttpMethod::Get, Some("/b"), &[]).unwrap();
        assert_eq!(seen.lock().unwrap().executions.len(), 2);
        assert_eq!(builder.status_code(), 200);
    }

    #[test]
    fn http_error_status_is_not_an_error() {
        let (_seen, mut builder) = recording_builder(Some(TransportResponse {
            status: 503,
            body: "unavailable".to_string(),
        }));
        builder
            .set_base_uri("http://localhost")
            .build()
            .send(HttpMethod::Get, None, &[])
            .unwrap();
        assert_eq!(builder.status_code(), 503);
    }

    #[test]
    fn transport_failure_records_error_state() {
        let (_seen, mut builder) = recording_builder(None);
        builder.set_base_uri("http://localhost").build();
        let err = builder.send(HttpMethod::Get, None, &[]).unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        let response = builder.response().unwrap();
        assert!(response.error.is_some());
    }

    #[test]
    #[should_panic(expected = "before a successful send")]
    fn status_code_after_transport_failure_panics() {
        let (_seen, mut builder) = recording_builder(None);
        builder.set_base_uri("http://localhost").build();
        let _ = builder.send(HttpMethod::Get, None, &[]);
        builder.status_code();
    }

    #[test]
    #[should_panic(expected = "before a successful send")]
    fn status_code_before_any_send_panics() {
        let (_seen, builder) = ok_builder();
        builder.status_code();
    }

    #[test]
    fn send_expecting_passes_on_match() {
        let (_seen, mut builder) = ok_builder();
        builder
            .set_base_uri("http://localhost")
            .build()
            .send_expecting(HttpMethod::Get, None, &[], 200)
            .unwrap();
        assert_eq!(builder.status_code(), 200);
    }

    #[test]
    fn send_expecting_converts_mismatch() {
        let (_seen, mut builder) = recording_builder(Some(TransportResponse {
            status: 500,
            body: "boom".to_string(),
        }));
        builder.set_base_uri("http://localhost").build();
        let err = builder
            .send_expecting(HttpMethod::Get, None, &[], 200)
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::UnexpectedStatus {
                expected: 200,
                actual: 500,
                ..
            }
        ));
    }
}
