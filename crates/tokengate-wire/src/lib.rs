//! Thin request layer over `reqwest`: URL and query construction, header
//! injection, GET/POST dispatch, and reply-to-handler processing.

pub mod envelope;

pub use envelope::{Envelope, EnvelopeHandler, STATUS_UNPROCESSED};

use std::collections::BTreeMap;

use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

/// Errors that can occur while building or executing a request.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("invalid request url: {0}")]
    Url(String),
    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed reply envelope: {0}")]
    Envelope(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A fully built request. GET carries its parameters in the query string,
/// POST carries them as a form-encoded body.
#[derive(Debug, Clone)]
pub struct WireRequest {
    url: Url,
    method: Method,
    params: BTreeMap<String, String>,
    headers: BTreeMap<String, String>,
}

impl WireRequest {
    pub fn builder(url: impl Into<String>) -> WireRequestBuilder {
        WireRequestBuilder::new(url)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Execute the request and hand the reply to `handler`.
    pub async fn send(
        &self,
        client: &Client,
        handler: &mut dyn ResponseHandler,
    ) -> Result<(), WireError> {
        let request = match self.method {
            Method::Get => client.get(self.url.clone()).query(&self.params),
            Method::Post => client.post(self.url.clone()).form(&self.params),
        };
        let request = self
            .headers
            .iter()
            .fold(request, |request, (name, value)| {
                request.header(name.as_str(), value.as_str())
            });

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        handler.handle(&WireResponse {
            status,
            headers,
            body,
        })
    }
}

/// Builder for [`WireRequest`]. A repeated parameter or header name
/// overwrites the earlier value; an empty name is ignored.
#[derive(Debug, Clone)]
pub struct WireRequestBuilder {
    url: String,
    method: Method,
    params: BTreeMap<String, String>,
    headers: BTreeMap<String, String>,
}

impl WireRequestBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::Get,
            params: BTreeMap::new(),
            headers: BTreeMap::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.params.insert(name, value.into());
        }
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.headers.insert(name, value.into());
        }
        self
    }

    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        for (name, value) in headers {
            self = self.header(name, value);
        }
        self
    }

    pub fn build(self) -> Result<WireRequest, WireError> {
        let url = Url::parse(&self.url).map_err(|err| WireError::Url(err.to_string()))?;
        Ok(WireRequest {
            url,
            method: self.method,
            params: self.params,
            headers: self.headers,
        })
    }
}

/// A reply read off the wire: HTTP status, headers, and the raw body.
#[derive(Debug)]
pub struct WireResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// Processes a reply after the transport exchange completed.
pub trait ResponseHandler {
    fn handle(&mut self, response: &WireResponse) -> Result<(), WireError>;
}
