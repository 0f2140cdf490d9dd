//
//  build-center-cli
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Transport for the Build Center API
//!
//! This module provides the single HTTP client every request goes through.
//! It handles URL resolution, authentication, content negotiation,
//! request/response conversion and status code mapping.
//!
//! ## Features
//!
//! - Relative URLs resolved against the configured server; absolute URLs untouched
//! - Bearer token injection and optional forward proxy
//! - JSON, form and multipart request bodies
//! - `Content-Type` checking against the requested accept type
//! - camelCase to snake_case conversion of every decoded response
//! - Streaming downloads in fixed 1 MiB chunks
//! - Distinct error variants per mapped status code

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Proxy, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

use super::common::{error_message, ApiError, WireResponse};
use super::encoding;

/// Accept and request content type used when the caller does not pick one.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Accept type for binary downloads.
pub const OCTET_STREAM_CONTENT_TYPE: &str = "application/octet-stream";

/// Size of the chunks written to a download sink.
pub const DOWNLOAD_CHUNK_SIZE: usize = 1024 * 1024;

/// Matches URLs that carry their own scheme (`http://`, `https://` or `://`).
static ABSOLUTE_URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(https?)?://").unwrap());

/// Joins a base URL and a path with exactly one `/` between them.
///
/// # Example
///
/// ```rust
/// use build_center_cli::api::client::join_url;
///
/// assert_eq!(join_url("admin/apps/abc", "releases"), "admin/apps/abc/releases");
/// assert_eq!(join_url("http://localhost:5000/", "/admin/apps"), "http://localhost:5000/admin/apps");
/// ```
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Returns `true` if the URL carries a scheme and must not be joined to the base.
pub fn is_absolute_url(url: &str) -> bool {
    ABSOLUTE_URL_PATTERN.is_match(url)
}

/// A parsed `Content-Type` value: MIME type plus charset.
///
/// The charset defaults to `utf-8` when absent, so `application/json` and
/// `application/json; charset=utf-8` compare equal. Comparison is
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// The MIME type, lowercased (e.g. `application/json`)
    pub mime: String,
    /// The charset parameter, lowercased, defaulting to `utf-8`
    pub charset: String,
}

impl ContentType {
    /// Parses a header value such as `text/html; charset=ISO-8859-1`.
    pub fn parse(line: &str) -> Self {
        let mut parts = line.splitn(2, ';');
        let mime = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
        let charset = parts
            .next()
            .into_iter()
            .flat_map(|params| params.split([';', ',']))
            .filter_map(|param| param.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
            .map(|(_, value)| value.trim().trim_matches('"').to_ascii_lowercase())
            .unwrap_or_else(|| "utf-8".to_string());

        Self { mime, charset }
    }

    /// Returns `true` for `application/json`.
    pub fn is_json(&self) -> bool {
        self.mime == JSON_CONTENT_TYPE
    }
}

/// A file attached to a multipart request.
///
/// The bytes are sent under the `file` part; every entry of `fields` becomes a
/// plain form field. Repeating a key sends the field several times, which is
/// how list-valued fields such as asset tags travel.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// File name reported in the `file` part
    pub file_name: String,
    /// File contents
    pub bytes: Vec<u8>,
    /// Additional form fields, in order
    pub fields: Vec<(String, String)>,
}

impl FileUpload {
    fn into_form(self) -> Form {
        let part = Part::bytes(self.bytes).file_name(self.file_name);
        self.fields
            .into_iter()
            .fold(Form::new().part("file", part), |form, (key, value)| {
                form.text(key, value)
            })
    }
}

/// The body of an outgoing request.
#[derive(Debug, Clone)]
pub enum Payload {
    /// No body
    Empty,
    /// A wire-ready mapping, sent as JSON or as form data depending on the
    /// request content type
    Mapping(Value),
    /// A multipart upload
    File(FileUpload),
}

/// Everything needed to issue one request.
///
/// Use the convenience methods on [`ApiClient`] for the common cases; build a
/// `RequestSpec` directly to choose a different accept or request content type.
#[derive(Debug, Clone)]
pub struct RequestSpec<'a> {
    /// HTTP method
    pub method: Method,
    /// Relative or absolute URL
    pub url: &'a str,
    /// Expected response content type
    pub accept: &'a str,
    /// Content type of a [`Payload::Mapping`] body
    pub content_type: &'a str,
    /// Request body
    pub payload: Payload,
}

impl<'a> RequestSpec<'a> {
    /// Creates a spec with JSON accept and content types and no body.
    pub fn new(method: Method, url: &'a str) -> Self {
        Self {
            method,
            url,
            accept: JSON_CONTENT_TYPE,
            content_type: JSON_CONTENT_TYPE,
            payload: Payload::Empty,
        }
    }

    /// Sets the expected response content type.
    pub fn accept(mut self, accept: &'a str) -> Self {
        self.accept = accept;
        self
    }

    /// Sets the request body content type.
    pub fn content_type(mut self, content_type: &'a str) -> Self {
        self.content_type = content_type;
        self
    }

    /// Sets the request body.
    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }
}

/// Maps an error status to its [`ApiError`] variant.
///
/// The message comes from the body's `error.message` field when the body is
/// JSON and carries one, otherwise from the canonical status reason.
/// Returns `None` for success statuses.
pub fn status_error(status: StatusCode, body: &str) -> Option<ApiError> {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| error_message(&json).map(str::to_string))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());

    match status {
        StatusCode::BAD_REQUEST => Some(ApiError::BadRequest(message)),
        StatusCode::UNAUTHORIZED => Some(ApiError::Unauthorized(message)),
        StatusCode::FORBIDDEN => Some(ApiError::Forbidden(message)),
        StatusCode::NOT_FOUND => Some(ApiError::NotFound(message)),
        s if !s.is_success() => Some(ApiError::TransportFailure {
            status: s.as_u16(),
            message,
        }),
        _ => None,
    }
}

/// The HTTP transport for the Build Center API.
///
/// Holds the server URL, the optional bearer token and the underlying
/// `reqwest` client. It keeps no per-call state, so one instance is shared
/// (behind an `Arc`) by every endpoint and bound resource.
///
/// # Example
///
/// ```rust,no_run
/// use build_center_cli::api::ApiClient;
///
/// let client = ApiClient::new("http://localhost:5000")?
///     .with_token("my-token")
///     .with_proxy("proxy.internal:3128")?;
/// assert_eq!(client.base_url(), "http://localhost:5000");
/// # Ok::<(), build_center_cli::api::ApiError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The underlying HTTP client
    http: Client,
    /// Server URL every relative URL is resolved against
    base_url: String,
    /// Optional bearer token
    token: Option<String>,
    /// Optional forward proxy (`host:port`)
    proxy: Option<String>,
}

impl ApiClient {
    /// Creates a client for the given server URL, without token or proxy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            http: build_http(None)?,
            base_url: base_url.into(),
            token: None,
            proxy: None,
        })
    }

    /// Sets the bearer token attached to every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Routes every request through the forward proxy at `address` (`host:port`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the proxy address is invalid.
    pub fn with_proxy(mut self, address: &str) -> Result<Self, ApiError> {
        self.http = build_http(Some(address))?;
        self.proxy = Some(address.to_string());
        Ok(self)
    }

    /// Returns the server URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the configured bearer token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the configured proxy address, if any.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Resolves a relative URL against the server URL.
    ///
    /// Absolute URLs are returned unchanged.
    pub fn resolve_url(&self, url: &str) -> String {
        if is_absolute_url(url) {
            url.to_string()
        } else {
            join_url(&self.base_url, url)
        }
    }

    /// Issues a GET request and returns the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`]; [`ApiError::MalformedResponse`] if the response has no
    /// JSON body.
    pub async fn get(&self, url: &str) -> Result<WireResponse, ApiError> {
        let spec = RequestSpec::new(Method::GET, url);
        require_body(self.request(spec, None).await?)
    }

    /// Encodes `body` with the wire conventions and POSTs it.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<WireResponse, ApiError> {
        self.send_encoded(Method::POST, url, body).await
    }

    /// Encodes `body` with the wire conventions and PUTs it.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<WireResponse, ApiError> {
        self.send_encoded(Method::PUT, url, body).await
    }

    /// POSTs a multipart upload.
    pub async fn post_with_file(
        &self,
        url: &str,
        upload: FileUpload,
    ) -> Result<WireResponse, ApiError> {
        let spec = RequestSpec::new(Method::POST, url).payload(Payload::File(upload));
        require_body(self.request(spec, None).await?)
    }

    /// Issues a DELETE request. Any JSON body in the response is discarded.
    pub async fn delete(&self, url: &str) -> Result<(), ApiError> {
        let spec = RequestSpec::new(Method::DELETE, url);
        self.request(spec, None).await.map(|_| ())
    }

    /// GETs `url` as `application/octet-stream` and streams the body into `sink`.
    pub async fn download(
        &self,
        url: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<(), ApiError> {
        let spec = RequestSpec::new(Method::GET, url).accept(OCTET_STREAM_CONTENT_TYPE);
        self.request(spec, Some(sink)).await.map(|_| ())
    }

    async fn send_encoded<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> Result<WireResponse, ApiError> {
        let mapping = encoding::to_wire(body)?;
        let spec = RequestSpec::new(method, url).payload(Payload::Mapping(mapping));
        require_body(self.request(spec, None).await?)
    }

    /// Issues one request and handles the response.
    ///
    /// The response is processed in this order:
    ///
    /// 1. 400, 401, 403 and 404 map to their dedicated variants; any other
    ///    non-2xx status maps to [`ApiError::TransportFailure`]
    /// 2. A `Content-Type` that differs from `spec.accept` fails with
    ///    [`ApiError::ContentTypeMismatch`]
    /// 3. With a `sink`, the body is streamed into it and `None` is returned
    /// 4. A JSON body is decoded, its keys snake_cased, checked for an
    ///    `error.message` field and returned with the raw text
    /// 5. Anything else returns `None`
    pub async fn request(
        &self,
        spec: RequestSpec<'_>,
        sink: Option<&mut (dyn AsyncWrite + Unpin + Send)>,
    ) -> Result<Option<WireResponse>, ApiError> {
        let url = self.resolve_url(spec.url);
        let mut request = self
            .http
            .request(spec.method.clone(), &url)
            .header(ACCEPT, spec.accept);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let has_body = matches!(spec.method, Method::POST | Method::PUT | Method::PATCH);
        request = match spec.payload {
            Payload::Mapping(mapping) if has_body => {
                debug!("> {} {} {}", spec.method, url, mapping);
                let request = request.header(CONTENT_TYPE, spec.content_type);
                if ContentType::parse(spec.content_type).is_json() {
                    request.json(&mapping)
                } else {
                    request.form(&mapping)
                }
            }
            Payload::File(upload) => {
                debug!(
                    "> {} {} file={} ({} bytes) fields={:?}",
                    spec.method,
                    url,
                    upload.file_name,
                    upload.bytes.len(),
                    upload.fields
                );
                request.multipart(upload.into_form())
            }
            _ => {
                debug!("> {} {}", spec.method, url);
                request
            }
        };

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!("< {} {}", status, text);
            return Err(status_error(status, &text).unwrap_or(ApiError::TransportFailure {
                status: status.as_u16(),
                message: text,
            }));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ContentType::parse);

        if let Some(actual) = &content_type {
            if *actual != ContentType::parse(spec.accept) {
                return Err(ApiError::ContentTypeMismatch {
                    expected: spec.accept.to_string(),
                    actual: format!("{}; charset={}", actual.mime, actual.charset),
                });
            }
        }

        if let Some(sink) = sink {
            let written = stream_to(response, sink).await?;
            debug!("< {} ({} bytes streamed)", status, written);
            return Ok(None);
        }

        match content_type {
            Some(content_type) if content_type.is_json() => {
                let raw = response.text().await?;
                debug!("< {} {}", status, raw);
                let decoded: Value = serde_json::from_str(&raw)
                    .map_err(|e| ApiError::MalformedResponse(format!("invalid JSON: {e}")))?;
                let body = encoding::decamelize_keys(decoded);
                if let Some(message) = error_message(&body) {
                    return Err(ApiError::ServerReported(message.to_string()));
                }
                Ok(Some(WireResponse { body, raw }))
            }
            _ => {
                debug!("< {}", status);
                Ok(None)
            }
        }
    }
}

fn build_http(proxy: Option<&str>) -> Result<Client, ApiError> {
    let mut builder = Client::builder().user_agent(format!("bc/{}", crate::VERSION));
    if let Some(address) = proxy {
        builder = builder.proxy(Proxy::all(format!("http://{address}"))?);
    }
    Ok(builder.build()?)
}

fn require_body(response: Option<WireResponse>) -> Result<WireResponse, ApiError> {
    response.ok_or_else(|| ApiError::MalformedResponse("expected a JSON response body".to_string()))
}

/// Writes the response body to `sink` in [`DOWNLOAD_CHUNK_SIZE`] chunks.
async fn stream_to(
    mut response: Response,
    sink: &mut (dyn AsyncWrite + Unpin + Send),
) -> Result<u64, ApiError> {
    let mut buffer: Vec<u8> = Vec::with_capacity(DOWNLOAD_CHUNK_SIZE);
    let mut written = 0u64;

    while let Some(bytes) = response.chunk().await? {
        buffer.extend_from_slice(&bytes);
        while buffer.len() >= DOWNLOAD_CHUNK_SIZE {
            sink.write_all(&buffer[..DOWNLOAD_CHUNK_SIZE]).await?;
            buffer.drain(..DOWNLOAD_CHUNK_SIZE);
            written += DOWNLOAD_CHUNK_SIZE as u64;
            trace!("wrote chunk, {} bytes so far", written);
        }
    }

    if !buffer.is_empty() {
        sink.write_all(&buffer).await?;
        written += buffer.len() as u64;
    }
    sink.flush().await?;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_content_type_parse() {
        let ct = ContentType::parse("application/json");
        assert_eq!(ct.mime, "application/json");
        assert_eq!(ct.charset, "utf-8");

        let ct = ContentType::parse("Text/HTML; charset=ISO-8859-1");
        assert_eq!(ct.mime, "text/html");
        assert_eq!(ct.charset, "iso-8859-1");
    }

    #[test]
    fn test_content_type_equality_defaults_charset() {
        assert_eq!(
            ContentType::parse("application/json; charset=utf-8"),
            ContentType::parse("application/json")
        );
        assert_ne!(
            ContentType::parse("application/json; charset=latin1"),
            ContentType::parse("application/json")
        );
    }

    #[test]
    fn test_absolute_url_detection() {
        assert!(is_absolute_url("http://example.com/x"));
        assert!(is_absolute_url("https://example.com/x"));
        assert!(is_absolute_url("://example.com/x"));
        assert!(!is_absolute_url("admin/apps"));
    }

    #[test]
    fn test_resolve_url() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(
            client.resolve_url("admin/apps"),
            "http://localhost:5000/admin/apps"
        );
        assert_eq!(
            client.resolve_url("https://other.example/admin/apps/1"),
            "https://other.example/admin/apps/1"
        );
    }

    #[test]
    fn test_status_error_mapping() {
        let body = r#"{"error": {"message": "name is required"}}"#;
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, body),
            Some(ApiError::BadRequest(m)) if m == "name is required"
        ));
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, ""),
            Some(ApiError::Unauthorized(_))
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, ""),
            Some(ApiError::Forbidden(_))
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "<html>"),
            Some(ApiError::NotFound(m)) if m == "Not Found"
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, ""),
            Some(ApiError::TransportFailure { status: 502, .. })
        ));
        assert!(status_error(StatusCode::OK, "").is_none());
    }

    #[tokio::test]
    async fn test_get_decamelizes_and_keeps_raw() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{"id":"abc","createdAt":1700000000000}"#;
        let mock = server
            .mock("GET", "/admin/apps/abc")
            .match_header("accept", "application/json")
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).unwrap().with_token("secret");
        let response = client.get("admin/apps/abc").await.unwrap();

        assert_eq!(response.body, json!({"id": "abc", "created_at": 1700000000000u64}));
        assert_eq!(response.raw, body);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_sends_camelized_json() {
        #[derive(Serialize)]
        struct NewRelease {
            version: String,
            app_id: Option<String>,
        }

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/admin/releases")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"version": "1.0.0", "appId": "app-1"})))
            .with_status(201)
            .with_header("content-type", "application/json; charset=utf-8")
            .with_body(r#"{"id":"r1","version":"1.0.0"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).unwrap();
        let response = client
            .post(
                "admin/releases",
                &NewRelease {
                    version: "1.0.0".into(),
                    app_id: Some("app-1".into()),
                },
            )
            .await
            .unwrap();

        assert_eq!(response.body["id"], "r1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_form_content_type_sends_form_data() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/form")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::UrlEncoded("name".into(), "demo".into()))
            .with_status(204)
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).unwrap();
        let spec = RequestSpec::new(Method::PATCH, "form")
            .content_type("application/x-www-form-urlencoded")
            .payload(Payload::Mapping(json!({"name": "demo"})));
        let response = client.request(spec, None).await.unwrap();

        assert!(response.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_content_type_mismatch() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/admin/apps")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).unwrap();
        let err = client.get("admin/apps").await.unwrap_err();
        assert!(matches!(err, ApiError::ContentTypeMismatch { .. }));
    }

    #[tokio::test]
    async fn test_error_message_in_success_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/admin/apps")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"message":"database unavailable"}}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).unwrap();
        let err = client.get("admin/apps").await.unwrap_err();
        assert!(matches!(err, ApiError::ServerReported(m) if m == "database unavailable"));
    }

    #[tokio::test]
    async fn test_unmapped_status_is_transport_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/admin/apps/x")
            .with_status(500)
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).unwrap();
        let err = client.delete("admin/apps/x").await.unwrap_err();
        assert!(matches!(err, ApiError::TransportFailure { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_missing_json_body_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/admin/apps")
            .with_status(204)
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).unwrap();
        let err = client.get("admin/apps").await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_download_streams_whole_body() {
        let payload: Vec<u8> = (0..(DOWNLOAD_CHUNK_SIZE + 4096))
            .map(|i| (i % 251) as u8)
            .collect();

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/files/blob")
            .match_header("accept", "application/octet-stream")
            .with_status(200)
            .with_header("content-type", "application/octet-stream")
            .with_body(payload.clone())
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).unwrap();
        let mut sink: Vec<u8> = Vec::new();
        client.download("files/blob", &mut sink).await.unwrap();

        assert_eq!(sink, payload);
        mock.assert_async().await;
    }
}
