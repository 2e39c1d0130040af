use checklist::model::{ItemPatch, NewItem, RowId};
use checklist::tree;

use super::render::print_tree;
use super::*;
use crate::{ItemAddArgs, ItemEditArgs, ItemRmArgs, RowArgs};

#[derive(Clone, Copy, Debug)]
pub(super) enum Move {
    Indent,
    Outdent,
    Up,
    Down,
}

async fn open_checklist(ctx: &CliContext, sheet: &str) -> Result<ChecklistView> {
    let view = ChecklistView::new(ctx.client()?, sheet);
    match view.load().await {
        Outcome::Done => Ok(view),
        _ => Err(checklist_failure(&view).await),
    }
}

async fn require_row(view: &ChecklistView, row: RowId) -> Result<()> {
    if tree::find_by_id(&view.items().await, row).is_none() {
        bail!("no item {} in checklist {}", row, view.sheet_id());
    }
    Ok(())
}

async fn print_result(view: &ChecklistView, done: bool) -> Result<()> {
    if !done {
        return Err(checklist_failure(view).await);
    }
    print_tree(&view.items().await);
    Ok(())
}

pub(super) async fn handle_items_command(ctx: &CliContext, sheet: &str, json: bool) -> Result<()> {
    let view = open_checklist(ctx, sheet).await?;
    let items = view.items().await;
    if json {
        return print_json(&items, "items");
    }
    print_tree(&items);
    Ok(())
}

pub(super) async fn handle_item_add_command(ctx: &CliContext, args: ItemAddArgs) -> Result<()> {
    let view = open_checklist(ctx, &args.sheet).await?;
    if let Some(parent) = args.parent {
        require_row(&view, parent).await?;
    }
    let item = NewItem {
        name: args.name,
        status: args.status.unwrap_or_default(),
        assignee: args.assignee.unwrap_or_default(),
        notes: args.notes.unwrap_or_default(),
        parent_id: args.parent,
    };
    let done = expect_done(view.create_item(item).await, "item name must not be empty")?;
    print_result(&view, done).await
}

pub(super) async fn handle_item_edit_command(ctx: &CliContext, args: ItemEditArgs) -> Result<()> {
    let view = open_checklist(ctx, &args.sheet).await?;
    require_row(&view, args.row).await?;
    let patch = ItemPatch {
        name: args.name,
        status: args.status,
        assignee: args.assignee,
        notes: args.notes,
    };
    let done = expect_done(
        view.update_item(args.row, patch).await,
        "nothing to change (pass --name, --status, --assignee or --notes)",
    )?;
    print_result(&view, done).await
}

pub(super) async fn handle_item_rm_command(ctx: &CliContext, args: ItemRmArgs) -> Result<()> {
    let view = open_checklist(ctx, &args.sheet).await?;
    require_row(&view, args.row).await?;
    let outcome = if args.yes {
        view.delete_item(args.row, &|_: &str| true).await
    } else {
        view.delete_item(args.row, &stdin_confirm).await
    };
    match outcome {
        Outcome::Skipped => {
            println!("Cancelled");
            Ok(())
        }
        other => print_result(&view, other == Outcome::Done).await,
    }
}

pub(super) async fn handle_item_move_command(
    ctx: &CliContext,
    args: RowArgs,
    direction: Move,
) -> Result<()> {
    let view = open_checklist(ctx, &args.sheet).await?;
    require_row(&view, args.row).await?;
    let outcome = match direction {
        Move::Indent => view.indent(args.row).await,
        Move::Outdent => view.outdent(args.row).await,
        Move::Up => view.move_up(args.row).await,
        Move::Down => view.move_down(args.row).await,
    };
    print_result(&view, outcome == Outcome::Done).await
}
