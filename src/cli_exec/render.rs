use checklist::model::{ChecklistItem, ItemStatus};
use checklist::tree;

fn status_mark(status: ItemStatus) -> char {
    match status {
        ItemStatus::NotStarted => ' ',
        ItemStatus::InProgress => '~',
        ItemStatus::Complete => 'x',
    }
}

pub(super) fn print_tree(items: &[ChecklistItem]) {
    if items.is_empty() {
        println!("No items yet");
        return;
    }

    for flat in tree::flatten_items(items) {
        let item = flat.item;
        let indent = "  ".repeat(flat.depth);
        let mut line = format!(
            "{}[{}] {} (#{})",
            indent,
            status_mark(item.status),
            item.name,
            item.id
        );
        if let Some(assignee) = item.assignee.as_deref().filter(|a| !a.is_empty()) {
            line.push_str(&format!(" @{}", assignee));
        }
        println!("{}", line);
        if let Some(notes) = item.notes.as_deref().filter(|n| !n.is_empty()) {
            println!("{}    {}", indent, notes);
        }
    }

    let counts = tree::count_items(items);
    println!(
        "{} of {} complete ({}%)",
        counts.complete,
        counts.total,
        counts.percent()
    );
}
