//! Checklist item CRUD and structural operations.
//!
//! Structural calls (indent, outdent, move) always answer with the whole
//! forest: the server decides what happens at tree boundaries.

use super::*;
use crate::model::{ChecklistItem, CreateItemReply, ItemPatch, NewItem, RowId};

fn items_path(sheet_id: &str) -> String {
    format!("/sheets/{}/items/", sheet_id)
}

fn item_path(sheet_id: &str, row_id: RowId) -> String {
    format!("/sheets/{}/items/{}/", sheet_id, row_id)
}

impl ApiClient {
    pub async fn get_items(&self, sheet_id: &str) -> Result<Vec<ChecklistItem>, ClientError> {
        self.request_body(&items_path(sheet_id), RequestOptions::get())
            .await
    }

    pub async fn create_item(
        &self,
        sheet_id: &str,
        item: &NewItem,
    ) -> Result<Option<CreateItemReply>, ClientError> {
        self.request(
            &format!("/sheets/{}/items/create/", sheet_id),
            RequestOptions::post().json(item)?,
        )
        .await
    }

    pub async fn update_item(
        &self,
        sheet_id: &str,
        row_id: RowId,
        patch: &ItemPatch,
    ) -> Result<Option<Vec<ChecklistItem>>, ClientError> {
        self.request(&item_path(sheet_id, row_id), RequestOptions::put().json(patch)?)
            .await
    }

    pub async fn delete_item(
        &self,
        sheet_id: &str,
        row_id: RowId,
    ) -> Result<Option<Vec<ChecklistItem>>, ClientError> {
        self.request(&item_path(sheet_id, row_id), RequestOptions::delete())
            .await
    }

    pub async fn indent_item(
        &self,
        sheet_id: &str,
        row_id: RowId,
    ) -> Result<Vec<ChecklistItem>, ClientError> {
        self.structural(sheet_id, row_id, "indent").await
    }

    pub async fn outdent_item(
        &self,
        sheet_id: &str,
        row_id: RowId,
    ) -> Result<Vec<ChecklistItem>, ClientError> {
        self.structural(sheet_id, row_id, "outdent").await
    }

    pub async fn move_item_up(
        &self,
        sheet_id: &str,
        row_id: RowId,
    ) -> Result<Vec<ChecklistItem>, ClientError> {
        self.structural(sheet_id, row_id, "move-up").await
    }

    pub async fn move_item_down(
        &self,
        sheet_id: &str,
        row_id: RowId,
    ) -> Result<Vec<ChecklistItem>, ClientError> {
        self.structural(sheet_id, row_id, "move-down").await
    }

    async fn structural(
        &self,
        sheet_id: &str,
        row_id: RowId,
        action: &str,
    ) -> Result<Vec<ChecklistItem>, ClientError> {
        let endpoint = format!("{}{}/", item_path(sheet_id, row_id), action);
        self.request_body(&endpoint, RequestOptions::post()).await
    }
}
