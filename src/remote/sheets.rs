use super::*;
use crate::model::{NewSheet, Sheet};

impl ApiClient {
    pub async fn list_sheets(&self) -> Result<Vec<Sheet>, ClientError> {
        self.request_body("/sheets/", RequestOptions::get()).await
    }

    pub async fn create_sheet(&self, name: &str) -> Result<Sheet, ClientError> {
        let body = NewSheet {
            name: name.to_string(),
        };
        self.request_body("/sheets/", RequestOptions::post().json(&body)?)
            .await
    }

    pub async fn delete_sheet(&self, sheet_id: &str) -> Result<(), ClientError> {
        self.request::<serde_json::Value>(
            &format!("/sheets/{}/", sheet_id),
            RequestOptions::delete(),
        )
        .await?;
        Ok(())
    }
}
