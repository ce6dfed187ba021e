//! The AirHub HTTP client.
//!
//! [`AirHubClient`] owns the HTTP connection pool, the configuration and a
//! cached OAuth token. Endpoint groups are exposed as short-lived service
//! handles borrowed from it:
//!
//! ```ignore
//! let client = AirHubClient::new(ClientConfig::from_env()?)?;
//! let advisories = client.advisories().query(&opts).await?;
//! ```

use airhub_protocol::{media_types, Scope, ServerMessage, Token};
use chrono::Utc;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::advisory::AdvisoryService;
use crate::aviation::AviationService;
use crate::check::CheckService;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::surface::SurfaceService;
use crate::token::TokenService;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Async client for the AirHub API.
///
/// Cheap to share behind an `Arc`; concurrent calls that find the cached
/// token stale wait on one refresh rather than each fetching their own.
pub struct AirHubClient {
    http: Client,
    config: ClientConfig,
    /// Validated API root without a trailing slash.
    base_url: String,
    token: Mutex<Option<Token>>,
}

impl AirHubClient {
    /// Create a client with its own connection pool.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()?;

        Self::with_http_client(config, http)
    }

    /// Create a client around an existing `reqwest::Client`.
    ///
    /// The configured timeouts are not applied to `http`.
    pub fn with_http_client(config: ClientConfig, http: Client) -> ClientResult<Self> {
        let base_url = config.validate()?.as_str().trim_end_matches('/').to_string();

        debug!(base_url = %base_url, "Created AirHub client");

        Ok(Self {
            http,
            config,
            base_url,
            token: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Advisory query, create, update and delete.
    pub fn advisories(&self) -> AdvisoryService<'_> {
        AdvisoryService::new(self)
    }

    /// Hexbin surfaces.
    pub fn surface(&self) -> SurfaceService<'_> {
        SurfaceService::new(self)
    }

    /// FAA aviation layers.
    pub fn aviation(&self) -> AviationService<'_> {
        AviationService::new(self)
    }

    /// Airspace authorization checks.
    pub fn check(&self) -> CheckService<'_> {
        CheckService::new(self)
    }

    /// Direct access to the OAuth token endpoint.
    pub fn tokens(&self) -> TokenService<'_> {
        TokenService::new(self)
    }

    /// A copy of the cached token, if any.
    pub async fn cached_token(&self) -> Option<Token> {
        self.token.lock().await.clone()
    }

    /// Drop the cached token so the next call fetches a fresh one.
    pub async fn invalidate_token(&self) {
        self.token.lock().await.take();
    }

    /// An access token carrying every scope in `needed`.
    ///
    /// The cached token is reused while it has those scopes and is valid
    /// past the refresh margin. Otherwise a new one is requested for the
    /// needed scopes plus whatever the cached token already held, so
    /// alternating between endpoints does not keep re-fetching.
    pub(crate) async fn access_token(&self, needed: &[Scope]) -> ClientResult<String> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_valid_at(Utc::now(), self.config.token_refresh_margin())
                && token.has_scopes(needed)
            {
                return Ok(token.access_token.clone());
            }
        }

        let scope = merge_scopes(needed, cached.as_ref());
        let token = self.tokens().request_token(&scope).await?;

        info!(
            scope = %token.scope,
            expires = %token.expires,
            "Refreshed AirHub access token"
        );

        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    /// Full URL for an API path such as `/v4/advisory`.
    pub(crate) fn endpoint(&self, path: &str) -> ClientResult<Url> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| ClientError::InvalidBaseUrl {
            url: raw,
            reason: e.to_string(),
        })
    }

    /// Like [`endpoint`](Self::endpoint) with one extra, percent-encoded
    /// path segment.
    pub(crate) fn endpoint_with_segment(&self, path: &str, segment: &str) -> ClientResult<Url> {
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "cannot be a base".to_string(),
            })?
            .push(segment);
        Ok(url)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Send an authenticated request and return the body of a 2xx answer.
    ///
    /// The payload is encoded before a token is fetched, so an
    /// unencodable payload never causes network traffic.
    pub(crate) async fn call<B>(
        &self,
        method: Method,
        url: Url,
        payload: Option<&B>,
        scope: Scope,
    ) -> ClientResult<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let body = payload
            .map(|payload| airhub_protocol::encode(payload))
            .transpose()
            .map_err(ClientError::Encode)?;

        let access_token = self.access_token(&[scope]).await?;

        let mut request = self
            .http
            .request(method, url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .bearer_auth(access_token);

        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static(media_types::JSON))
                .body(body);
        }

        self.send(request).await
    }

    /// Execute a prepared request, mapping non-2xx answers to
    /// [`ClientError::Api`].
    pub(crate) async fn send(&self, request: RequestBuilder) -> ClientResult<Vec<u8>> {
        let request = request.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        debug!(method = %method, path = %path, "Sending AirHub request");

        let response = self.http.execute(request).await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = error_message(status, &body);
            warn!(
                method = %method,
                path = %path,
                status = status.as_u16(),
                message = %message,
                "AirHub request failed"
            );
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            bytes = body.len(),
            "AirHub request succeeded"
        );

        Ok(body.to_vec())
    }
}

/// Decode a success body.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> ClientResult<T> {
    airhub_protocol::decode(body).map_err(ClientError::Decode)
}

/// Best human-readable message for a failed response: the body's
/// `message` field, else the raw body, else the status reason.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ServerMessage>(body) {
        if !parsed.message.is_empty() {
            return parsed.message;
        }
    }

    let text = String::from_utf8_lossy(body).trim().to_string();
    if !text.is_empty() {
        return text;
    }

    status
        .canonical_reason()
        .unwrap_or("unknown status")
        .to_string()
}

/// Space-separated union of the needed scopes and those already granted.
fn merge_scopes(needed: &[Scope], cached: Option<&Token>) -> String {
    let mut scopes: Vec<&str> = needed.iter().map(Scope::as_str).collect();
    if let Some(token) = cached {
        for granted in token.scopes() {
            if !scopes.contains(&granted) {
                scopes.push(granted);
            }
        }
    }
    scopes.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(scope: &str) -> Token {
        Token {
            access_token: "abc".to_string(),
            expires: Utc::now() + Duration::hours(1),
            scope: scope.to_string(),
        }
    }

    #[test]
    fn test_merge_scopes_without_cache() {
        assert_eq!(
            merge_scopes(&[Scope::AdvisoryRead], None),
            "airhub-api/advisory.read"
        );
    }

    #[test]
    fn test_merge_scopes_keeps_granted() {
        let cached = token("airhub-api/aviation.read airhub-api/advisory.read");
        assert_eq!(
            merge_scopes(&[Scope::AdvisoryRead], Some(&cached)),
            "airhub-api/advisory.read airhub-api/aviation.read"
        );
    }

    #[test]
    fn test_error_message_prefers_message_field() {
        let body = br#"{"statusCode":400,"message":"something invalid happened"}"#;
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, body),
            "something invalid happened"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_body_then_reason() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, b"upstream timed out\n"),
            "upstream timed out"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, br#"{"error":"x"}"#),
            r#"{"error":"x"}"#
        );
        assert_eq!(error_message(StatusCode::NOT_FOUND, b""), "Not Found");
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let config = ClientConfig::default().with_base_url("http://localhost:8080/api/");
        let client = AirHubClient::new(config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(
            client.endpoint("/v4/advisory/query").unwrap().as_str(),
            "http://localhost:8080/api/v4/advisory/query"
        );
        assert_eq!(
            client
                .endpoint_with_segment("/v4/advisory", "a b/c")
                .unwrap()
                .as_str(),
            "http://localhost:8080/api/v4/advisory/a%20b%2Fc"
        );
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let config = ClientConfig::default().with_base_url("::nope::");
        assert!(matches!(
            AirHubClient::new(config),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AirHubClient>();
    }
}
