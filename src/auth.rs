//! Who is signed in, and the token bookkeeping around login and logout.

use tracing::{debug, warn};

use crate::model::{RegisterRequest, User};
use crate::remote::{ApiClient, ClientError};

pub struct AuthSession {
    client: ApiClient,
    user: Option<User>,
}

impl AuthSession {
    pub fn new(client: ApiClient) -> Self {
        Self { client, user: None }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Picks up a session left by an earlier run. Any failure to load the
    /// profile drops the stored tokens.
    pub async fn restore(&mut self) -> Result<Option<&User>, ClientError> {
        if !self.client.has_access_token()? {
            return Ok(None);
        }
        match self.client.get_profile().await {
            Ok(user) => {
                self.user = Some(user);
            }
            Err(err) => {
                debug!(error = %err, "stored session is not usable");
                self.client.tokens().clear().map_err(ClientError::Store)?;
                self.user = None;
            }
        }
        Ok(self.user.as_ref())
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User, ClientError> {
        let pair = self.client.login(email, password).await?;
        self.client
            .tokens()
            .set(&pair.access, &pair.refresh)
            .map_err(ClientError::Store)?;
        let profile = self.client.get_profile().await?;
        Ok(self.user.insert(profile))
    }

    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        smartsheet_token: &str,
    ) -> Result<&User, ClientError> {
        let req = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            smartsheet_token: smartsheet_token.to_string(),
        };
        let out = self.client.register(&req).await?;
        self.client
            .tokens()
            .set(&out.access, &out.refresh)
            .map_err(ClientError::Store)?;
        Ok(self.user.insert(out.user))
    }

    /// Server-side logout is best effort; local tokens are always dropped.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        if let Err(err) = self.client.logout().await {
            warn!(error = %err, "server logout failed, clearing local session anyway");
        }
        self.client.tokens().clear().map_err(ClientError::Store)?;
        self.user = None;
        Ok(())
    }
}
