use checklist::views::{SheetsState, SheetsView};

use super::*;

fn sheets_failure(st: &SheetsState) -> anyhow::Error {
    view_failure(st.error(), st.signed_out)
}

pub(super) async fn handle_sheets_command(ctx: &CliContext, json: bool) -> Result<()> {
    let view = SheetsView::new(ctx.client()?);
    if view.load().await != Outcome::Done {
        return Err(sheets_failure(&view.snapshot().await));
    }

    let sheets = view.sheets().await;
    if json {
        return print_json(&sheets, "sheets");
    }
    if sheets.is_empty() {
        println!("No checklists yet (create one with `checklist sheet create <name>`)");
    }
    for sheet in sheets {
        println!("{} {}", sheet.id, sheet.name);
    }
    Ok(())
}

pub(super) async fn handle_sheet_command(ctx: &CliContext, command: SheetCommands) -> Result<()> {
    let view = SheetsView::new(ctx.client()?);
    match command {
        SheetCommands::Create { name } => {
            let outcome = view.create_sheet(&name).await;
            if !expect_done(outcome, "checklist name must not be empty")? {
                return Err(sheets_failure(&view.snapshot().await));
            }
            if let Some(sheet) = view.sheets().await.first() {
                println!("Created {} {}", sheet.id, sheet.name);
            }
        }
        SheetCommands::Rm { id, yes } => {
            let outcome = if yes {
                view.delete_sheet(&id, &|_: &str| true).await
            } else {
                view.delete_sheet(&id, &stdin_confirm).await
            };
            match outcome {
                Outcome::Done => println!("Removed {}", id),
                Outcome::Skipped => println!("Cancelled"),
                Outcome::Failed => return Err(sheets_failure(&view.snapshot().await)),
            }
        }
    }
    Ok(())
}
