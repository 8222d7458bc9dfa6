// Kuna cloud API HTTP client
//
// Wraps `reqwest::Client` with vendor-specific URL construction, bearer
// token injection, and status normalization. All endpoint modules
// (cameras, recordings) are implemented as inherent methods via separate
// files to keep this module focused on transport mechanics.

use std::sync::RwLock;

use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::{TransportConfig, USER_AGENT_THUMBNAIL};

/// Production base URL of the Kuna cloud service.
pub const API_URL: &str = "https://server.kunasystems.com/api/v1";

/// Raw HTTP client for the Kuna cloud REST API.
///
/// Holds the bearer token issued by [`authenticate`](ApiClient::authenticate)
/// and attaches it to every subsequent request as `Authorization: Token <t>`
/// (the vendor's custom scheme). A 403 on any call means the token is empty
/// or expired and surfaces as [`Error::Unauthorized`]; every other non-2xx
/// status surfaces as [`Error::Api`] with the body attached.
pub struct ApiClient {
    http: reqwest::Client,
    http_no_redirect: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`, pointed at the
    /// production API.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = Url::parse(API_URL)?;
        Ok(Self {
            http: transport.build_client()?,
            http_no_redirect: transport.build_client_no_redirect()?,
            base_url,
            token: RwLock::new(None),
        })
    }

    /// Create a client against an arbitrary base URL (tests, staging).
    pub fn with_base_url(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            http_no_redirect: transport.build_client_no_redirect()?,
            base_url,
            token: RwLock::new(None),
        })
    }

    /// Create a client with pre-built `reqwest::Client` instances.
    pub fn with_clients(
        http: reqwest::Client,
        http_no_redirect: reqwest::Client,
        base_url: Url,
    ) -> Self {
        Self {
            http,
            http_no_redirect,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a bearer token is currently held.
    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    /// The current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_token(&self, token: String) {
        *self
            .token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(token);
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/{path}/`.
    ///
    /// The vendor API requires the trailing slash on every endpoint.
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let full = format!(
            "{}/{}/",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_matches('/')
        );
        Url::parse(&full).expect("invalid API URL")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and parse the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = self.api_url(path);
        debug!("GET {}", url);

        let mut req = self.http.get(url).query(params);
        req = self.authorize(req);
        let resp = req.send().await.map_err(Error::Transport)?;

        self.parse_json(Self::check_status(resp).await?).await
    }

    /// Send a POST request with JSON body and parse the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let url = self.api_url(path);
        debug!("POST {}", url);

        let mut req = self.http.post(url).json(body);
        req = self.authorize(req);
        let resp = req.send().await.map_err(Error::Transport)?;

        self.parse_json(Self::check_status(resp).await?).await
    }

    /// Send a PATCH request with JSON body and parse the JSON response.
    pub(crate) async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let url = self.api_url(path);
        debug!("PATCH {}", url);

        let mut req = self.http.patch(url).json(body);
        req = self.authorize(req);
        let resp = req.send().await.map_err(Error::Transport)?;

        self.parse_json(Self::check_status(resp).await?).await
    }

    /// Send a GET request for a binary body (thumbnail images).
    ///
    /// Issued with the image user agent -- the CDN serves thumbnails only
    /// to the CFNetwork UA.
    pub(crate) async fn get_bytes(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<u8>, Error> {
        let url = self.api_url(path);
        debug!("GET {} (image)", url);

        let mut req = self
            .http
            .get(url)
            .query(params)
            .header(reqwest::header::USER_AGENT, USER_AGENT_THUMBNAIL);
        req = self.authorize(req);
        let resp = req.send().await.map_err(Error::Transport)?;

        let resp = Self::check_status(resp).await?;
        Ok(resp.bytes().await.map_err(Error::Transport)?.to_vec())
    }

    /// Send a GET request with redirect-following disabled and return the
    /// `Location` header of the response.
    ///
    /// Used to read signed media URLs without fetching the media body.
    pub(crate) async fn get_location(&self, path: &str) -> Result<String, Error> {
        let url = self.api_url(path);
        debug!("GET {} (redirect suppressed)", url);

        let mut req = self.http_no_redirect.get(url.clone());
        req = self.authorize(req);
        let resp = req.send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Unauthorized);
        }
        if !status.is_redirection() && !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        resp.headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned)
            .ok_or(Error::MissingRedirect {
                url: url.to_string(),
            })
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Attach the bearer token header when a token is held.
    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token() {
            Some(token) => req.header(AUTHORIZATION, format!("Token {token}")),
            None => req,
        }
    }

    /// Map a non-2xx status to an error: 403 means the token was rejected,
    /// anything else carries the status and body.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Unauthorized);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp)
    }

    /// Read the body and deserialize, keeping the raw text for debugging.
    async fn parse_json<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
