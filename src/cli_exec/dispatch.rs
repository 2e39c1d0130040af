use super::items::{
    handle_item_add_command, handle_item_edit_command, handle_item_move_command,
    handle_item_rm_command, handle_items_command, Move,
};
use super::session::{
    handle_config_command, handle_login_command, handle_logout_command, handle_register_command,
    handle_whoami_command,
};
use super::sheets::{handle_sheet_command, handle_sheets_command};
use super::*;

pub(super) async fn handle_command(ctx: &CliContext, command: Commands) -> Result<()> {
    match command {
        Commands::Register(args) => handle_register_command(ctx, args).await?,
        Commands::Login(args) => handle_login_command(ctx, &args.email, &args.password).await?,
        Commands::Logout => handle_logout_command(ctx).await?,
        Commands::Whoami(args) => handle_whoami_command(ctx, args.json).await?,
        Commands::Config { command } => handle_config_command(ctx, command)?,
        Commands::Sheets(args) => handle_sheets_command(ctx, args.json).await?,
        Commands::Sheet { command } => handle_sheet_command(ctx, command).await?,
        Commands::Items(args) => handle_items_command(ctx, &args.sheet, args.json).await?,
        Commands::Item { command } => match command {
            ItemCommands::Add(args) => handle_item_add_command(ctx, args).await?,
            ItemCommands::Edit(args) => handle_item_edit_command(ctx, args).await?,
            ItemCommands::Rm(args) => handle_item_rm_command(ctx, args).await?,
            ItemCommands::Indent(args) => handle_item_move_command(ctx, args, Move::Indent).await?,
            ItemCommands::Outdent(args) => {
                handle_item_move_command(ctx, args, Move::Outdent).await?
            }
            ItemCommands::Up(args) => handle_item_move_command(ctx, args, Move::Up).await?,
            ItemCommands::Down(args) => handle_item_move_command(ctx, args, Move::Down).await?,
        },
    }

    Ok(())
}
