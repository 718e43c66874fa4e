//! Request gateway for the auction API
//!
//! Every call goes through [`FetchBuilder`], which attaches the bearer token and
//! API-key header, serializes JSON bodies and decodes the response envelope:
//!
//! - success: `{ "data": ..., "meta": ... }`
//! - failure: `{ "errors": [ { "message": "..." } ] }`; only the first entry is surfaced
//!
//! Nothing here retries; placing a bid twice creates two bids.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::auth::Session;
use crate::config::ClientOptions;
use crate::error::{Error, Result};

const CLIENT_INFO: &str = concat!("fortis-auction/", env!("CARGO_PKG_VERSION"));

/// Pagination metadata attached to list responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub is_first_page: Option<bool>,
    pub is_last_page: Option<bool>,
    pub current_page: Option<u32>,
    pub previous_page: Option<u32>,
    pub next_page: Option<u32>,
    pub page_count: Option<u32>,
    pub total_count: Option<u32>,
}

/// Decoded success envelope. `data` is absent when the server sent none.
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Shape a decoded body into an envelope.
    pub fn from_body(body: Value) -> Result<Self> {
        let mut body = match body {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let data = match body.remove("data") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                serde_json::from_value::<T>(value).map_err(|e| Error::malformed(e.to_string()))?,
            ),
        };
        let meta = body
            .remove("meta")
            .and_then(|value| serde_json::from_value::<Meta>(value).ok());

        Ok(Self { data, meta })
    }
}

impl<T: DeserializeOwned> Envelope<Vec<T>> {
    /// Shape a list body, dropping entries that do not decode as `T`.
    ///
    /// `data` must still be an array when present.
    pub fn list_from_body(body: Value) -> Result<Self> {
        let envelope = Envelope::<Vec<Value>>::from_body(body)?;
        let data = envelope.data.map(|items| {
            items
                .into_iter()
                .filter_map(|item| match serde_json::from_value::<T>(item) {
                    Ok(decoded) => Some(decoded),
                    Err(e) => {
                        log::debug!("dropping malformed list entry: {}", e);
                        None
                    }
                })
                .collect()
        });
        Ok(Self {
            data,
            meta: envelope.meta,
        })
    }
}

impl<T> Envelope<Vec<T>> {
    /// The list payload, empty when absent.
    pub fn into_vec(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}

/// Decode a response body. Empty or unparseable text becomes the empty mapping.
pub fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Object(Map::new());
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// The first structured error message in `body`, or `fallback`.
pub fn error_message(body: &Value, fallback: &str) -> String {
    body.get("errors")
        .and_then(|errors| errors.get(0))
        .and_then(|first| first.get("message"))
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Shared HTTP plumbing: the reqwest client plus options
#[derive(Clone)]
pub struct Gateway {
    client: Client,
    options: Arc<ClientOptions>,
}

impl Gateway {
    pub fn new(client: Client, options: Arc<ClientOptions>) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Build the URL for a path under the base URL. Segments are percent-encoded.
    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.options.base_url)?;
        url.path_segments_mut()
            .map_err(|_| {
                Error::validation(format!(
                    "Base URL {:?} cannot be a base.",
                    self.options.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn request(&self, method: Method, segments: &[&str]) -> FetchBuilder<'_> {
        FetchBuilder::new(self, method, segments)
    }

    pub fn get(&self, segments: &[&str]) -> FetchBuilder<'_> {
        self.request(Method::GET, segments)
    }

    pub fn post(&self, segments: &[&str]) -> FetchBuilder<'_> {
        self.request(Method::POST, segments)
    }

    pub fn put(&self, segments: &[&str]) -> FetchBuilder<'_> {
        self.request(Method::PUT, segments)
    }

    pub fn delete(&self, segments: &[&str]) -> FetchBuilder<'_> {
        self.request(Method::DELETE, segments)
    }
}

/// Helper for building and executing one request
pub struct FetchBuilder<'a> {
    gateway: &'a Gateway,
    method: Method,
    segments: Vec<String>,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    fallback: String,
}

impl<'a> FetchBuilder<'a> {
    fn new(gateway: &'a Gateway, method: Method, segments: &[&str]) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("X-Client-Info", HeaderValue::from_static(CLIENT_INFO));

        Self {
            gateway,
            method,
            segments: segments.iter().map(|s| s.to_string()).collect(),
            headers,
            query_params: Vec::new(),
            body: None,
            fallback: "Request failed.".to_string(),
        }
    }

    /// Add a header to the request. Invalid names or values are skipped.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add bearer token authentication to the request
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("Authorization", &format!("Bearer {}", token))
    }

    /// Attach both credentials of `session`.
    ///
    /// Fails before any I/O when the session is incomplete.
    pub fn session(self, session: &Session) -> Result<Self> {
        if !session.is_complete() {
            return Err(Error::auth(
                "Missing auth credentials (accessToken/apiKey/name).",
            ));
        }
        let header = self.gateway.options.api_key_header.clone();
        Ok(self
            .bearer_auth(&session.access_token)
            .header(&header, &session.api_key))
    }

    /// Attach credentials when a complete session is available; anonymous otherwise.
    pub fn optional_session(self, session: Option<&Session>) -> Self {
        match session.filter(|s| s.is_complete()) {
            Some(session) => {
                let header = self.gateway.options.api_key_header.clone();
                self.bearer_auth(&session.access_token)
                    .header(&header, &session.api_key)
            }
            None => self,
        }
    }

    /// Add query parameters to the request, keeping their order
    pub fn query<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query_params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let json = serde_json::to_vec(body)?;
        self.headers
            .insert("Content-Type", HeaderValue::from_static("application/json"));
        self.body = Some(json);
        Ok(self)
    }

    /// Message used when a failed response carries no structured error
    pub fn fallback(mut self, message: &str) -> Self {
        self.fallback = message.to_string();
        self
    }

    fn build(&self) -> Result<RequestBuilder> {
        let segments: Vec<&str> = self.segments.iter().map(String::as_str).collect();
        let mut url = self.gateway.url(&segments)?;

        if !self.query_params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                query_pairs.append_pair(key, value);
            }
        }

        log::debug!("{} {}", self.method, url.path());

        let mut req = self
            .gateway
            .client
            .request(self.method.clone(), url.as_str())
            .headers(self.headers.clone());

        if let Some(timeout) = self.gateway.options.request_timeout {
            req = req.timeout(timeout);
        }
        if let Some(body) = &self.body {
            req = req.body(body.clone());
        }

        Ok(req)
    }

    async fn send(&self) -> Result<(StatusCode, Value)> {
        let response = self.build()?.send().await?;
        let status = response.status();
        let text = response.text().await?;
        Ok((status, decode_body(&text)))
    }

    /// Execute the request and return the decoded body.
    ///
    /// An empty success body decodes to the empty mapping.
    pub async fn execute_value(&self) -> Result<Value> {
        let (status, body) = self.send().await?;
        if !status.is_success() {
            let message = error_message(&body, &self.fallback);
            log::debug!("request failed with {}: {}", status, message);
            return Err(Error::remote(status, message));
        }
        Ok(body)
    }

    /// Execute the request and decode the `{data, meta}` envelope
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<Envelope<T>> {
        let body = self.execute_value().await?;
        Envelope::from_body(body)
    }

    /// Execute the request and decode a list envelope entry by entry
    pub async fn execute_list<T: DeserializeOwned>(&self) -> Result<Envelope<Vec<T>>> {
        let body = self.execute_value().await?;
        Envelope::<Vec<T>>::list_from_body(body)
    }

    /// Execute a deletion. Only `204 No Content` counts as success.
    pub async fn execute_no_content(&self) -> Result<()> {
        let (status, body) = self.send().await?;
        if status == StatusCode::NO_CONTENT {
            return Ok(());
        }
        let message = if status.is_success() {
            self.fallback.clone()
        } else {
            error_message(&body, &self.fallback)
        };
        Err(Error::remote(status, message))
    }
}
