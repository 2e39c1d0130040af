use clap::Subcommand;

use crate::{ConfigCommands, ItemCommands, SheetCommands};

mod account;
mod sheets;

pub(crate) use self::account::{LoginArgs, RegisterArgs, WhoamiArgs};
pub(crate) use self::sheets::{
    ItemAddArgs, ItemEditArgs, ItemRmArgs, ItemsArgs, RowArgs, SheetsArgs,
};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create an account and sign in
    Register(RegisterArgs),

    /// Sign in with email and password
    Login(LoginArgs),

    /// Sign out and forget the stored tokens
    Logout,

    /// Show the signed-in user
    Whoami(WhoamiArgs),

    /// Show or change client settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// List your checklists
    Sheets(SheetsArgs),

    /// Create or remove a checklist
    Sheet {
        #[command(subcommand)]
        command: SheetCommands,
    },

    /// Show a checklist as an indented tree
    Items(ItemsArgs),

    /// Add, edit, remove or rearrange items in a checklist
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },
}
