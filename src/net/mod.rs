//! Transport layer for the Atlas REST API.
//!
//! This module provides:
//!
//! - **[`Transport`]**: the seam every outbound request goes through
//! - **[`HttpTransport`]**: the reqwest implementation, with a cookie store
//!   so the backend's session cookie travels with every request
//! - **[`ApiClient`]**: typed `get` / `post` / `patch` / `delete` on top of
//!   any transport, including JSON headers and error-body decoding
//!
//! # Examples
//!
//! ```rust,no_run
//! use atlas::net::ApiClient;
//! use atlas::types::{ApiResponse, Tool};
//! use atlas::ClientConfig;
//!
//! # async fn example() -> atlas::Result<()> {
//! let client = ApiClient::http(&ClientConfig::from_env())?;
//!
//! let tools: ApiResponse<Vec<Tool>> = client
//!     .get("/tools", &[("sort", "trending".to_string())])
//!     .await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::{config::ClientConfig, error::Result, types::ApiResponse};

pub mod json;

/// A request as handed to a [`Transport`].
///
/// Headers are already merged and the body already serialized to a JSON
/// value; the transport only has to put it on the wire.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API root, e.g. `/me/bookmarks`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

/// Status and raw body of a response, before any decoding.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends requests to the backend.
///
/// Implementations return every response they receive, whatever its status;
/// [`ApiClient`] decides what counts as failure. Only failures to obtain a
/// response at all are errors here.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// Builds the full request URL.
///
/// The query string is appended only when at least one parameter is given,
/// using standard `application/x-www-form-urlencoded` encoding.
///
/// # Examples
///
/// ```rust
/// use atlas::net::build_url;
///
/// let plain = build_url("https://host/api/v1", "/tools", &[]);
/// assert_eq!(plain, "https://host/api/v1/tools");
///
/// let query = vec![("q".to_string(), "speech to text".to_string())];
/// let searched = build_url("https://host/api/v1", "/search/tools", &query);
/// assert_eq!(searched, "https://host/api/v1/search/tools?q=speech+to+text");
/// ```
pub fn build_url(base_url: &str, path: &str, query: &[(String, String)]) -> String {
    let mut url = format!("{}{}", base_url, path);
    if !query.is_empty() {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish();
        url.push('?');
        url.push_str(&encoded);
    }
    url
}

/// Merges caller headers over the JSON defaults; caller values win.
pub fn merge_headers(caller: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for name in caller.keys() {
        headers.remove(name);
        for value in caller.get_all(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}

/// [`Transport`] over a reqwest client.
///
/// Each instance owns its own connection pool and cookie jar; construct one
/// per application instance.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport for the configured base URL.
    ///
    /// # Errors
    ///
    /// * [`Error::Network`](crate::Error::Network) - If the TLS backend cannot be initialized
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .pool_max_idle_per_host(10)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        let url = build_url(&self.base_url, &request.path, &request.query);
        let mut builder = self
            .client
            .request(request.method, &url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(serde_json::to_vec(&body)?);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok(RawResponse { status, body })
    }
}

/// Typed JSON client over a [`Transport`].
///
/// Cloning is cheap: clones share the transport.
///
/// # Examples
///
/// ```rust,no_run
/// use atlas::net::ApiClient;
/// use atlas::ClientConfig;
///
/// # fn example() -> atlas::Result<()> {
/// let client = ApiClient::http(&ClientConfig::default())?
///     .with_header("X-Client", "atlas-cli");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    headers: HeaderMap,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            headers: HeaderMap::new(),
        }
    }

    /// Client over a fresh [`HttpTransport`].
    pub fn http(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    /// Adds a header to every request made by this client.
    ///
    /// Invalid names or values are ignored. A `Content-Type` set here
    /// replaces the JSON default.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (name.parse::<HeaderName>(), value.parse::<HeaderValue>())
        {
            self.headers.insert(name, value);
        }
        self
    }

    pub async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let query = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        self.execute(Method::GET, path, query, None).await
    }

    /// GET that unwraps the `data` field of the success envelope.
    pub async fn get_data<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response: ApiResponse<T> = self.get(path, query).await?;
        Ok(response.data)
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.execute(Method::POST, path, Vec::new(), Some(body)).await
    }

    /// POST without a request body.
    pub async fn post_empty<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.execute(Method::POST, path, Vec::new(), None).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.execute(Method::PATCH, path, Vec::new(), Some(body)).await
    }

    /// PATCH without a request body.
    pub async fn patch_empty<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.execute(Method::PATCH, path, Vec::new(), None).await
    }

    pub async fn delete<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.execute(Method::DELETE, path, Vec::new(), None).await
    }

    async fn execute<T>(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!(%method, path, "sending request");

        let request = ApiRequest {
            method,
            path: path.to_string(),
            query,
            headers: merge_headers(&self.headers),
            body,
        };

        let response = self.transport.send(request).await?;
        if !response.status.is_success() {
            debug!(status = %response.status, path, "request failed");
            return Err(json::decode_error(response.status, &response.body));
        }

        json::decode_success(&response.body)
    }
}
