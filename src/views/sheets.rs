use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::{Confirm, ErrorSlot, Outcome, ShownError};
use crate::model::Sheet;
use crate::remote::{ApiClient, ClientError};

#[derive(Clone, Debug, Default)]
pub struct SheetsState {
    /// Newest first, as the backend orders them.
    pub sheets: Vec<Sheet>,
    pub loading: bool,
    pub creating: bool,
    pub error: ErrorSlot,
    pub signed_out: bool,
}

impl SheetsState {
    pub fn error(&self) -> Option<&ShownError> {
        self.error.current()
    }

    fn fail(&mut self, err: &ClientError) {
        if err.is_session_expired() {
            self.signed_out = true;
        } else {
            self.error.show(err);
        }
    }
}

/// Controller for the list of the user's checklists.
#[derive(Clone)]
pub struct SheetsView {
    client: ApiClient,
    state: Arc<RwLock<SheetsState>>,
}

impl SheetsView {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(SheetsState::default())),
        }
    }

    pub async fn snapshot(&self) -> SheetsState {
        self.state.read().await.clone()
    }

    pub async fn sheets(&self) -> Vec<Sheet> {
        self.state.read().await.sheets.clone()
    }

    pub async fn load(&self) -> Outcome {
        self.state.write().await.loading = true;
        let result = self.client.list_sheets().await;

        let mut st = self.state.write().await;
        st.loading = false;
        match result {
            Ok(sheets) => {
                st.sheets = sheets;
                st.error.clear();
                Outcome::Done
            }
            Err(err) => {
                debug!(error = %err, "loading sheets failed");
                st.fail(&err);
                Outcome::Failed
            }
        }
    }

    pub async fn retry(&self) -> Outcome {
        self.load().await
    }

    pub async fn create_sheet(&self, name: &str) -> Outcome {
        if name.trim().is_empty() {
            return Outcome::Skipped;
        }
        {
            let mut st = self.state.write().await;
            if st.creating {
                return Outcome::Skipped;
            }
            st.creating = true;
            st.error.clear();
        }

        let result = self.client.create_sheet(name).await;

        let mut st = self.state.write().await;
        st.creating = false;
        match result {
            Ok(sheet) => {
                st.sheets.insert(0, sheet);
                Outcome::Done
            }
            Err(err) => {
                st.fail(&err);
                Outcome::Failed
            }
        }
    }

    pub async fn delete_sheet(&self, sheet_id: &str, confirm: &impl Confirm) -> Outcome {
        if !confirm.confirm("Remove this checklist?") {
            return Outcome::Skipped;
        }

        let result = self.client.delete_sheet(sheet_id).await;

        let mut st = self.state.write().await;
        match result {
            Ok(()) => {
                st.sheets.retain(|s| s.id != sheet_id);
                Outcome::Done
            }
            Err(err) => {
                st.fail(&err);
                Outcome::Failed
            }
        }
    }
}
