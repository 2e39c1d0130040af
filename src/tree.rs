//! Pure helpers over an ordered forest of checklist items.
//!
//! Every function takes the forest by reference and returns a fresh one, so a
//! caller can hold on to the input as a rollback snapshot.

use crate::model::{ChecklistItem, ItemPatch, RowId};

/// Drops the node with `id` (and its subtree) wherever it sits.
pub fn remove_by_id(tree: &[ChecklistItem], id: RowId) -> Vec<ChecklistItem> {
    tree.iter()
        .filter(|item| item.id != id)
        .map(|item| ChecklistItem {
            children: remove_by_id(&item.children, id),
            ..item.clone_shallow()
        })
        .collect()
}

/// Merges `patch` into the node with `id`. Traversal visits every depth since
/// the match can be anywhere.
pub fn update_by_id(tree: &[ChecklistItem], id: RowId, patch: &ItemPatch) -> Vec<ChecklistItem> {
    tree.iter()
        .map(|item| {
            let mut next = item.clone_shallow();
            if item.id == id {
                patch.apply_to(&mut next);
            }
            next.children = update_by_id(&item.children, id, patch);
            next
        })
        .collect()
}

/// Appends `item` as the last child of `parent`, or as the last root when
/// `parent` is `None` or not in the forest.
pub fn insert_child(
    tree: &[ChecklistItem],
    parent: Option<RowId>,
    item: ChecklistItem,
) -> Vec<ChecklistItem> {
    if let Some(parent_id) = parent
        && find_by_id(tree, parent_id).is_some()
    {
        return append_under(tree, parent_id, &item);
    }
    let mut out = tree.to_vec();
    out.push(item);
    out
}

fn append_under(tree: &[ChecklistItem], parent_id: RowId, item: &ChecklistItem) -> Vec<ChecklistItem> {
    tree.iter()
        .map(|node| {
            let mut next = node.clone_shallow();
            next.children = append_under(&node.children, parent_id, item);
            if node.id == parent_id {
                next.children.push(item.clone());
            }
            next
        })
        .collect()
}

pub fn find_by_id(tree: &[ChecklistItem], id: RowId) -> Option<&ChecklistItem> {
    for item in tree {
        if item.id == id {
            return Some(item);
        }
        if let Some(found) = find_by_id(&item.children, id) {
            return Some(found);
        }
    }
    None
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemCounts {
    pub total: usize,
    pub complete: usize,
}

impl ItemCounts {
    /// Rounded completion percentage; an empty forest reads as 0%.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.complete as f64 / self.total as f64) * 100.0).round() as u32
    }
}

pub fn count_items(tree: &[ChecklistItem]) -> ItemCounts {
    let mut counts = ItemCounts::default();
    for item in tree {
        counts.total += 1;
        if item.is_complete() {
            counts.complete += 1;
        }
        let child = count_items(&item.children);
        counts.total += child.total;
        counts.complete += child.complete;
    }
    counts
}

#[derive(Clone, Copy, Debug)]
pub struct FlatItem<'a> {
    pub item: &'a ChecklistItem,
    pub depth: usize,
}

impl FlatItem<'_> {
    /// Parent-selector label, one dash per level.
    pub fn label(&self) -> String {
        format!("{} {}", "—".repeat(self.depth), self.item.name)
    }
}

/// Pre-order walk with each node's distance from its root.
pub fn flatten_items(tree: &[ChecklistItem]) -> Vec<FlatItem<'_>> {
    fn walk<'a>(items: &'a [ChecklistItem], depth: usize, out: &mut Vec<FlatItem<'a>>) {
        for item in items {
            out.push(FlatItem { item, depth });
            walk(&item.children, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(tree, 0, &mut out);
    out
}

impl ChecklistItem {
    /// Copies the node's own fields; children are rebuilt by the caller.
    fn clone_shallow(&self) -> ChecklistItem {
        ChecklistItem {
            id: self.id,
            name: self.name.clone(),
            status: self.status,
            assignee: self.assignee.clone(),
            notes: self.notes.clone(),
            parent_id: self.parent_id,
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "tests/tree_tests.rs"]
mod tests;
