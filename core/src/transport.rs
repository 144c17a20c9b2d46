//! Blocking ureq-backed implementation of the `Transport` contract.
//!
//! # Design
//! The agent is configured with `http_status_as_error(false)` so 4xx/5xx
//! responses come back as data; only failures to complete the exchange map
//! to `ClientError::Transport`. Basic-auth credentials become a standard
//! `Authorization: Basic` header the moment they are set, matching the
//! builder's eager-auth contract. Timeout and retry policy stay out of this
//! layer; callers who need them configure the agent.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::ClientError;
use crate::http::{expand_path, ContentType, HttpMethod, Transport, TransportResponse};

/// Real transport: one blocking `ureq` agent plus the configuration the
/// builder has applied so far.
pub struct UreqTransport {
    agent: ureq::Agent,
    log: bool,
    target_url: Option<String>,
    headers: Vec<(String, String)>,
    content_type: Option<ContentType>,
}

impl UreqTransport {
    /// `log` enables full request/response detail at debug level through the
    /// `log` facade. It has no effect on behavior.
    pub fn new(log: bool) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            agent,
            log,
            target_url: None,
            headers: Vec::new(),
            content_type: None,
        }
    }

    fn prepared<B>(&self, mut builder: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(content_type) = self.content_type {
            builder = builder.header("Content-Type", content_type.mime());
        }
        builder
    }
}

impl Transport for UreqTransport {
    fn set_target_url(&mut self, url: &str) {
        self.target_url = Some(url.to_string());
    }

    fn set_header(&mut self, name: &str, value: &str) {
        match self.headers.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    fn set_content_type(&mut self, content_type: ContentType) {
        self.content_type = Some(content_type);
    }

    fn set_basic_auth(&mut self, username: &str, password: &str) {
        let credential = STANDARD.encode(format!("{username}:{password}"));
        self.set_header("Authorization", &format!("Basic {credential}"));
    }

    fn execute(
        &mut self,
        method: HttpMethod,
        endpoint: Option<&str>,
        params: &[&str],
        body: Option<&str>,
    ) -> Result<TransportResponse, ClientError> {
        let base = self.target_url.clone().unwrap_or_default();
        let url = match endpoint {
            Some(endpoint) => format!("{base}{}", expand_path(endpoint, params)),
            None => base,
        };

        if self.log {
            log::debug!("> {} {url}", method.as_str());
            for (name, value) in &self.headers {
                log::debug!("> {name}: {value}");
            }
            if let Some(body) = body {
                log::debug!("> {body}");
            }
        }

        let result = match (method, body) {
            (HttpMethod::Get, _) => self.prepared(self.agent.get(&url)).call(),
            (HttpMethod::Head, _) => self.prepared(self.agent.head(&url)).call(),
            (HttpMethod::Delete, _) => self.prepared(self.agent.delete(&url)).call(),
            (HttpMethod::Post, Some(body)) => {
                self.prepared(self.agent.post(&url)).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => self.prepared(self.agent.post(&url)).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                self.prepared(self.agent.put(&url)).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => self.prepared(self.agent.put(&url)).send_empty(),
            (HttpMethod::Patch, Some(body)) => {
                self.prepared(self.agent.patch(&url)).send(body.as_bytes())
            }
            (HttpMethod::Patch, None) => self.prepared(self.agent.patch(&url)).send_empty(),
        };

        let mut response = result.map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if self.log {
            log::debug!("< {status}");
            log::debug!("< {body}");
        }

        Ok(TransportResponse { status, body })
    }
}
