use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::*;
use crate::model::{AccessToken, RefreshRequest};

impl ApiClient {
    /// Sends one request with the stored bearer token.
    ///
    /// A 401 on anything but [`TOKEN_ENDPOINT`] triggers a single refresh. If
    /// that works the original request is replayed once and its outcome is
    /// final. If it does not, both tokens are cleared, the session-expired hook
    /// runs and the call ends with [`ClientError::SessionExpired`].
    ///
    /// `Ok(None)` means 204 No Content.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        opts: RequestOptions,
    ) -> Result<Option<T>, ClientError> {
        let access = self.token(TokenKind::Access)?;
        let resp = self.send(endpoint, &opts, access.as_deref()).await?;

        if resp.status() == StatusCode::UNAUTHORIZED && endpoint != TOKEN_ENDPOINT {
            debug!(endpoint, "access token rejected, trying refresh");
            if self.refresh_access(access.as_deref()).await? {
                let access = self.token(TokenKind::Access)?;
                let retry = self.send(endpoint, &opts, access.as_deref()).await?;
                return read_reply(retry).await;
            }
            self.expire_session()?;
            return Err(ClientError::SessionExpired);
        }

        read_reply(resp).await
    }

    /// Like [`request`](Self::request) for endpoints that always answer with a body.
    pub(super) async fn request_body<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        opts: RequestOptions,
    ) -> Result<T, ClientError> {
        self.request(endpoint, opts)
            .await?
            .ok_or_else(|| ClientError::EmptyResponse(endpoint.to_string()))
    }

    async fn send(
        &self,
        endpoint: &str,
        opts: &RequestOptions,
        access: Option<&str>,
    ) -> Result<reqwest::Response, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in opts.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
        if let Some(token) = access {
            headers.insert(AUTHORIZATION, bearer(token)?);
        }

        let mut req = self
            .client
            .request(opts.method.clone(), self.url(endpoint))
            .headers(headers);
        if let Some(body) = &opts.body {
            req = req.body(body.clone());
        }

        let resp = req.send().await.map_err(ClientError::from_transport)?;
        debug!(
            method = %opts.method,
            endpoint,
            status = resp.status().as_u16(),
            "api response"
        );
        Ok(resp)
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// Refreshes are serialized; when another request already replaced
    /// `stale` while this one waited, the new token is used as-is.
    async fn refresh_access(&self, stale: Option<&str>) -> Result<bool, ClientError> {
        let _guard = self.refresh_lock.lock().await;

        let current = self.token(TokenKind::Access)?;
        if current.is_some() && current.as_deref() != stale {
            debug!("access token already refreshed by a concurrent request");
            return Ok(true);
        }

        let Some(refresh) = self.token(TokenKind::Refresh)? else {
            debug!("no refresh token stored");
            return Ok(false);
        };

        let body = serde_json::to_vec(&RefreshRequest { refresh: &refresh })?;
        let sent = self
            .client
            .post(self.url(REFRESH_ENDPOINT))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;
        let resp = match sent {
            Ok(resp) => resp,
            Err(err) => {
                warn!(error = %err, "token refresh failed");
                return Ok(false);
            }
        };
        if !resp.status().is_success() {
            warn!(status = resp.status().as_u16(), "token refresh rejected");
            return Ok(false);
        }

        match resp.json::<AccessToken>().await {
            Ok(fresh) => {
                self.tokens
                    .set(&fresh.access, &refresh)
                    .map_err(ClientError::Store)?;
                info!("access token refreshed");
                Ok(true)
            }
            Err(err) => {
                warn!(error = %err, "token refresh returned an unreadable body");
                Ok(false)
            }
        }
    }

    fn expire_session(&self) -> Result<(), ClientError> {
        warn!("session expired, clearing stored tokens");
        self.tokens.clear().map_err(ClientError::Store)?;
        if let Some(hook) = &self.on_session_expired {
            hook();
        }
        Ok(())
    }
}

fn bearer(token: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
        ClientError::Store(anyhow::anyhow!(
            "stored access token is not a valid header value"
        ))
    })
}

async fn read_reply<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<Option<T>, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let data = match resp.bytes().await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|_| serde_json::json!({})),
            Err(_) => serde_json::json!({}),
        };
        return Err(ApiError::new(status.as_u16(), data).into());
    }
    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    let bytes = resp.bytes().await.map_err(ClientError::from_transport)?;
    Ok(Some(serde_json::from_slice(&bytes)?))
}
