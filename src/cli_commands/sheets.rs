use clap::Args;

use checklist::model::{ItemStatus, RowId};

#[derive(Args)]
pub(crate) struct SheetsArgs {
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct ItemsArgs {
    pub(crate) sheet: String,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct ItemAddArgs {
    pub(crate) sheet: String,
    #[arg(long)]
    pub(crate) name: String,
    /// One of: not-started, in-progress, complete
    #[arg(long)]
    pub(crate) status: Option<ItemStatus>,
    #[arg(long)]
    pub(crate) assignee: Option<String>,
    #[arg(long)]
    pub(crate) notes: Option<String>,
    /// Row id of the parent item (defaults to top level)
    #[arg(long)]
    pub(crate) parent: Option<RowId>,
}

#[derive(Args)]
pub(crate) struct ItemEditArgs {
    pub(crate) sheet: String,
    pub(crate) row: RowId,
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long)]
    pub(crate) status: Option<ItemStatus>,
    #[arg(long)]
    pub(crate) assignee: Option<String>,
    #[arg(long)]
    pub(crate) notes: Option<String>,
}

#[derive(Args)]
pub(crate) struct ItemRmArgs {
    pub(crate) sheet: String,
    pub(crate) row: RowId,
    /// Skip the confirmation prompt
    #[arg(long)]
    pub(crate) yes: bool,
}

#[derive(Args)]
pub(crate) struct RowArgs {
    pub(crate) sheet: String,
    pub(crate) row: RowId,
}
