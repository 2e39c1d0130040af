use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Spreadsheet row id; unique within a sheet and stable across edits.
pub type RowId = i64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ItemStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Complete")]
    Complete,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::NotStarted => "Not Started",
            ItemStatus::InProgress => "In Progress",
            ItemStatus::Complete => "Complete",
        }
    }
}

/// Sheets edited by hand can carry a blank or free-text Status cell; anything
/// that is not one of the three wire names reads as not started.
impl<'de> Deserialize<'de> for ItemStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref() {
            Some("In Progress") => ItemStatus::InProgress,
            Some("Complete") => ItemStatus::Complete,
            _ => ItemStatus::NotStarted,
        })
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown status {0:?} (expected not-started, in-progress or complete)")]
pub struct StatusParseError(String);

impl FromStr for ItemStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s
            .trim()
            .to_ascii_lowercase()
            .replace(['-', '_'], " ");
        match norm.as_str() {
            "not started" => Ok(ItemStatus::NotStarted),
            "in progress" => Ok(ItemStatus::InProgress),
            "complete" => Ok(ItemStatus::Complete),
            _ => Err(StatusParseError(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: RowId,
    pub name: String,
    #[serde(default)]
    pub status: ItemStatus,

    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub parent_id: Option<RowId>,

    /// Sibling display order as returned by the server.
    #[serde(default)]
    pub children: Vec<ChecklistItem>,
}

impl ChecklistItem {
    pub fn is_complete(&self) -> bool {
        self.status == ItemStatus::Complete
    }
}

/// Body of `POST /sheets/{id}/items/create/`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NewItem {
    pub name: String,
    pub status: ItemStatus,
    pub assignee: String,
    pub notes: String,
    pub parent_id: Option<RowId>,
}

impl NewItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update; only the fields that are set are sent and merged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.status.is_none() && self.assignee.is_none() && self.notes.is_none()
    }

    /// Shallow merge: every set field overwrites the item's field. Children are left alone.
    pub fn apply_to(&self, item: &mut ChecklistItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(status) = self.status {
            item.status = status;
        }
        if let Some(assignee) = &self.assignee {
            item.assignee = Some(assignee.clone());
        }
        if let Some(notes) = &self.notes {
            item.notes = Some(notes.clone());
        }
    }
}

/// The create endpoint answers with either the refreshed forest or the new row.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum CreateItemReply {
    Forest(Vec<ChecklistItem>),
    Item(ChecklistItem),
}

#[cfg(test)]
#[path = "../tests/model/item_tests.rs"]
mod tests;
