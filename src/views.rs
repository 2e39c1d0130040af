//! State controllers behind the sheet list and checklist screens.
//!
//! Each view owns its state behind an async lock so a renderer can take
//! snapshots while an operation is in flight. Errors never escape an
//! operation; they land in the view's error banner instead.

use std::time::Duration;

use crate::model::RowId;
use crate::remote::ClientError;

mod checklist;
mod sheets;

pub use self::checklist::{ChecklistState, ChecklistView, Reconcile, TreeEdit};
pub use self::sheets::{SheetsState, SheetsView};

/// What the busy marker is keyed on: an existing row, or the create form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RowKey {
    New,
    Row(RowId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Failed,
    /// Not attempted: blank input, declined confirmation, or the row was busy.
    Skipped,
}

#[derive(Clone, Debug)]
pub struct ViewSettings {
    /// How long a non-retryable error stays on the banner.
    pub error_dismiss_after: Duration,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            error_dismiss_after: Duration::from_secs(3),
        }
    }
}

/// Gate for destructive actions.
pub trait Confirm: Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShownError {
    pub message: String,
    pub status: Option<u16>,
    /// Retryable errors stay up until the next attempt and offer a retry.
    pub retryable: bool,
    generation: u64,
}

#[derive(Clone, Debug, Default)]
pub struct ErrorSlot {
    current: Option<ShownError>,
    generation: u64,
}

impl ErrorSlot {
    pub fn current(&self) -> Option<&ShownError> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Shows `err` and returns the generation a later dismissal must match.
    fn show(&mut self, err: &ClientError) -> u64 {
        self.generation += 1;
        self.current = Some(ShownError {
            message: err.user_message(),
            status: err.status(),
            retryable: err.is_retryable(),
            generation: self.generation,
        });
        self.generation
    }

    /// Clears the banner only if it still shows the error from `generation`.
    fn dismiss(&mut self, generation: u64) -> bool {
        if self
            .current
            .as_ref()
            .is_some_and(|e| e.generation == generation)
        {
            self.current = None;
            return true;
        }
        false
    }
}
