//! Registration, login/logout and profile endpoints.

use super::*;
use crate::model::{LoginRequest, ProfileUpdate, RegisterRequest, RegisterResponse, TokenPair, User};

impl ApiClient {
    pub async fn register(&self, req: &RegisterRequest) -> Result<RegisterResponse, ClientError> {
        self.request_body("/register/", RequestOptions::post().json(req)?)
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, ClientError> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.request_body(TOKEN_ENDPOINT, RequestOptions::post().json(&req)?)
            .await
    }

    /// Blacklists the stored refresh token server-side. Local tokens are left
    /// for the caller to clear.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let refresh = self.token(TokenKind::Refresh)?;
        let body = serde_json::json!({ "refresh": refresh });
        self.request::<serde_json::Value>("/logout/", RequestOptions::post().json(&body)?)
            .await?;
        Ok(())
    }

    pub async fn get_profile(&self) -> Result<User, ClientError> {
        self.request_body("/profile/", RequestOptions::get()).await
    }

    pub async fn update_profile(&self, name: &str) -> Result<User, ClientError> {
        let body = ProfileUpdate {
            name: name.to_string(),
        };
        self.request_body("/profile/", RequestOptions::patch().json(&body)?)
            .await
    }
}
