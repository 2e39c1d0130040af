use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{Confirm, ErrorSlot, Outcome, RowKey, ShownError, ViewSettings};
use crate::model::{ChecklistItem, CreateItemReply, ItemPatch, NewItem, RowId, SheetId};
use crate::remote::{ApiClient, ClientError};
use crate::tree::{self, FlatItem, ItemCounts};

/// Local edit applied before the server answers.
pub type TreeEdit = Box<dyn FnOnce(&[ChecklistItem]) -> Vec<ChecklistItem> + Send>;

/// How a successful server answer folds into local state.
#[derive(Clone, Debug)]
pub enum Reconcile {
    /// The server sent the whole forest back; it wins.
    Replace(Vec<ChecklistItem>),
    /// The server sent just the created row.
    Insert(ChecklistItem),
    Keep,
}

#[derive(Clone, Debug, Default)]
pub struct ChecklistState {
    pub items: Vec<ChecklistItem>,
    pub loading: bool,
    /// Rows with a request in flight; their controls should be disabled.
    pub busy: BTreeSet<RowKey>,
    pub error: ErrorSlot,
    /// Set once the session ended; the user has to log in again.
    pub signed_out: bool,

    /// Rows reserved by an operation, including ones not yet marked busy.
    in_flight: BTreeSet<RowKey>,
    /// Bumped on every change to `items`.
    revision: u64,
}

impl ChecklistState {
    pub fn error(&self) -> Option<&ShownError> {
        self.error.current()
    }

    pub fn is_busy(&self, row: RowKey) -> bool {
        self.busy.contains(&row)
    }

    pub fn counts(&self) -> ItemCounts {
        tree::count_items(&self.items)
    }

    pub fn flattened(&self) -> Vec<FlatItem<'_>> {
        tree::flatten_items(&self.items)
    }

    fn set_items(&mut self, items: Vec<ChecklistItem>) {
        self.items = items;
        self.revision += 1;
    }
}

/// Holds a row in `in_flight`/`busy` for one `perform` call. Dropping it
/// without `release` (the caller gave up on the future) still frees the row.
struct Reservation {
    state: Arc<RwLock<ChecklistState>>,
    row: RowKey,
    held: bool,
}

impl Reservation {
    async fn release(mut self) {
        free_row(&mut *self.state.write().await, self.row);
        self.held = false;
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        if !self.held {
            return;
        }
        debug!(row = ?self.row, "operation dropped before settling, freeing row");
        if let Ok(mut st) = self.state.try_write() {
            free_row(&mut st, self.row);
            return;
        }
        // Lock is taken right now; free the row once it is available.
        let state = Arc::clone(&self.state);
        let row = self.row;
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                free_row(&mut *state.write().await, row);
            });
        } else {
            warn!(?row, "no runtime to free dropped row");
        }
    }
}

fn free_row(st: &mut ChecklistState, row: RowKey) {
    st.busy.remove(&row);
    st.in_flight.remove(&row);
}

/// Controller for one sheet's checklist. Owns the only copy of the tree.
#[derive(Clone)]
pub struct ChecklistView {
    sheet_id: SheetId,
    client: ApiClient,
    settings: ViewSettings,
    state: Arc<RwLock<ChecklistState>>,
}

impl ChecklistView {
    pub fn new(client: ApiClient, sheet_id: impl Into<SheetId>) -> Self {
        Self {
            sheet_id: sheet_id.into(),
            client,
            settings: ViewSettings::default(),
            state: Arc::new(RwLock::new(ChecklistState::default())),
        }
    }

    pub fn with_settings(mut self, settings: ViewSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn sheet_id(&self) -> &str {
        &self.sheet_id
    }

    pub async fn snapshot(&self) -> ChecklistState {
        self.state.read().await.clone()
    }

    pub async fn items(&self) -> Vec<ChecklistItem> {
        self.state.read().await.items.clone()
    }

    pub async fn counts(&self) -> ItemCounts {
        self.state.read().await.counts()
    }

    pub async fn load(&self) -> Outcome {
        self.state.write().await.loading = true;
        let result = self.client.get_items(&self.sheet_id).await;

        let mut st = self.state.write().await;
        st.loading = false;
        match result {
            Ok(items) => {
                st.set_items(items);
                st.error.clear();
                Outcome::Done
            }
            Err(err) => {
                debug!(sheet = %self.sheet_id, error = %err, "load failed");
                if err.is_session_expired() {
                    st.signed_out = true;
                } else {
                    st.error.show(&err);
                }
                Outcome::Failed
            }
        }
    }

    /// Bound to the banner's retry control.
    pub async fn retry(&self) -> Outcome {
        self.load().await
    }

    pub async fn create_item(&self, item: NewItem) -> Outcome {
        if item.name.trim().is_empty() {
            return Outcome::Skipped;
        }
        let client = &self.client;
        let sheet_id = &self.sheet_id;
        self.perform(RowKey::New, None, async move {
            let reply = client.create_item(sheet_id, &item).await?;
            Ok::<_, ClientError>(match reply {
                Some(CreateItemReply::Forest(items)) => Reconcile::Replace(items),
                Some(CreateItemReply::Item(created)) => Reconcile::Insert(created),
                None => Reconcile::Keep,
            })
        })
        .await
    }

    pub async fn update_item(&self, row_id: RowId, patch: ItemPatch) -> Outcome {
        if patch.is_empty() {
            return Outcome::Skipped;
        }
        let local = patch.clone();
        let edit: TreeEdit =
            Box::new(move |items: &[ChecklistItem]| tree::update_by_id(items, row_id, &local));
        let client = &self.client;
        let sheet_id = &self.sheet_id;
        self.perform(RowKey::Row(row_id), Some(edit), async move {
            let reply = client.update_item(sheet_id, row_id, &patch).await?;
            Ok::<_, ClientError>(reply.map_or(Reconcile::Keep, Reconcile::Replace))
        })
        .await
    }

    pub async fn delete_item(&self, row_id: RowId, confirm: &impl Confirm) -> Outcome {
        if !confirm.confirm("Delete this item?") {
            return Outcome::Skipped;
        }
        let edit: TreeEdit =
            Box::new(move |items: &[ChecklistItem]| tree::remove_by_id(items, row_id));
        let client = &self.client;
        let sheet_id = &self.sheet_id;
        self.perform(RowKey::Row(row_id), Some(edit), async move {
            let reply = client.delete_item(sheet_id, row_id).await?;
            Ok::<_, ClientError>(reply.map_or(Reconcile::Keep, Reconcile::Replace))
        })
        .await
    }

    pub async fn indent(&self, row_id: RowId) -> Outcome {
        let fut = self.client.indent_item(&self.sheet_id, row_id);
        self.perform(RowKey::Row(row_id), None, async move {
            fut.await.map(Reconcile::Replace)
        })
        .await
    }

    pub async fn outdent(&self, row_id: RowId) -> Outcome {
        let fut = self.client.outdent_item(&self.sheet_id, row_id);
        self.perform(RowKey::Row(row_id), None, async move {
            fut.await.map(Reconcile::Replace)
        })
        .await
    }

    pub async fn move_up(&self, row_id: RowId) -> Outcome {
        let fut = self.client.move_item_up(&self.sheet_id, row_id);
        self.perform(RowKey::Row(row_id), None, async move {
            fut.await.map(Reconcile::Replace)
        })
        .await
    }

    pub async fn move_down(&self, row_id: RowId) -> Outcome {
        let fut = self.client.move_item_down(&self.sheet_id, row_id);
        self.perform(RowKey::Row(row_id), None, async move {
            fut.await.map(Reconcile::Replace)
        })
        .await
    }

    /// Runs one row-targeted operation.
    ///
    /// The optimistic `edit` is visible immediately; the row is marked busy
    /// one scheduling turn later and unmarked once `remote` settles. On
    /// failure the tree goes back to what it was before the edit.
    pub async fn perform<F>(&self, row: RowKey, edit: Option<TreeEdit>, remote: F) -> Outcome
    where
        F: Future<Output = Result<Reconcile, ClientError>>,
    {
        let (snapshot, revision) = {
            let mut st = self.state.write().await;
            if !st.in_flight.insert(row) {
                debug!(?row, "row already busy, ignoring");
                return Outcome::Skipped;
            }
            let snapshot = st.items.clone();
            if let Some(edit) = edit {
                let next = edit(&st.items);
                st.set_items(next);
                debug!(?row, "applied optimistic edit");
            }
            (snapshot, st.revision)
        };
        let reservation = Reservation {
            state: Arc::clone(&self.state),
            row,
            held: true,
        };

        tokio::task::yield_now().await;
        {
            let mut st = self.state.write().await;
            st.busy.insert(row);
            st.error.clear();
        }

        let outcome = match remote.await {
            Ok(reconcile) => {
                self.reconcile(reconcile).await;
                Outcome::Done
            }
            Err(err) => {
                self.roll_back(snapshot, revision).await;
                self.report(&err).await;
                Outcome::Failed
            }
        };

        reservation.release().await;
        outcome
    }

    async fn reconcile(&self, reconcile: Reconcile) {
        let mut st = self.state.write().await;
        match reconcile {
            Reconcile::Replace(items) => {
                debug!(count = items.len(), "replacing tree with server copy");
                st.set_items(items);
            }
            Reconcile::Insert(item) => {
                let parent = item.parent_id;
                let next = tree::insert_child(&st.items, parent, item);
                st.set_items(next);
            }
            Reconcile::Keep => {}
        }
    }

    /// Restores `snapshot` unless another operation changed the tree after
    /// this one's edit; then the server copy is fetched instead.
    async fn roll_back(&self, snapshot: Vec<ChecklistItem>, revision: u64) {
        {
            let mut st = self.state.write().await;
            if st.revision == revision {
                debug!("rolling back to pre-operation snapshot");
                st.set_items(snapshot);
                return;
            }
        }

        warn!(sheet = %self.sheet_id, "tree changed during failed operation, reloading");
        let fresh = self.client.get_items(&self.sheet_id).await;
        let mut st = self.state.write().await;
        match fresh {
            Ok(items) => st.set_items(items),
            Err(err) => {
                warn!(error = %err, "reload after failure did not work, restoring snapshot");
                st.set_items(snapshot);
            }
        }
    }

    async fn report(&self, err: &ClientError) {
        let mut st = self.state.write().await;
        if err.is_session_expired() {
            st.signed_out = true;
            return;
        }
        let generation = st.error.show(err);
        if err.is_retryable() {
            return;
        }

        let state = Arc::clone(&self.state);
        let after = self.settings.error_dismiss_after;
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            state.write().await.error.dismiss(generation);
        });
    }
}

#[cfg(test)]
#[path = "../tests/views/checklist_tests.rs"]
mod tests;
