use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Serialize;

use crate::model::ClientConfig;
use crate::store::{TokenKind, TokenStore};

mod error;
pub use self::error::{ApiError, ClientError};

mod http_client;

mod account;
mod items;
mod sheets;

/// Issues the token pair; a 401 here means bad credentials, never a stale token.
pub const TOKEN_ENDPOINT: &str = "/token/";
pub const REFRESH_ENDPOINT: &str = "/token/refresh/";

type SessionExpiredHook = Arc<dyn Fn() + Send + Sync>;

/// HTTP client for the checklist backend.
///
/// Cloning is cheap; clones share the connection pool, the token store and
/// the refresh lock.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    client: reqwest::Client,
    refresh_lock: Arc<tokio::sync::Mutex<()>>,
    on_session_expired: Option<SessionExpiredHook>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Option<Duration>,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent("checklist");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("build reqwest client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
            client,
            refresh_lock: Arc::new(tokio::sync::Mutex::new(())),
            on_session_expired: None,
        })
    }

    pub fn from_config(cfg: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        Self::new(
            &cfg.api_base,
            cfg.timeout_secs.map(Duration::from_secs),
            tokens,
        )
    }

    /// Called after both tokens were cleared because no refresh path was left.
    /// This is the "send the user back to the login screen" signal.
    pub fn on_session_expired(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_session_expired = Some(Arc::new(hook));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn has_access_token(&self) -> Result<bool, ClientError> {
        Ok(self.token(TokenKind::Access)?.is_some())
    }

    pub(crate) fn token(&self, kind: TokenKind) -> Result<Option<String>, ClientError> {
        self.tokens.get(kind).map_err(ClientError::Store)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

/// Method, JSON body and extra headers for one call to [`ApiClient::request`].
#[derive(Clone, Debug)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Vec<u8>>,
    /// Applied over the defaults, so a caller can replace `Content-Type`.
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }
}
