use clap::Subcommand;

use crate::{ItemAddArgs, ItemEditArgs, ItemRmArgs, RowArgs};

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show the effective settings
    Show {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Point the client at another backend
    SetUrl { url: String },
}

#[derive(Subcommand)]
pub(crate) enum SheetCommands {
    /// Create a new checklist
    Create { name: String },

    /// Remove a checklist and all of its items
    Rm {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum ItemCommands {
    /// Add an item, optionally under a parent
    Add(ItemAddArgs),

    /// Change fields of an item
    Edit(ItemEditArgs),

    /// Remove an item and its sub-items
    Rm(ItemRmArgs),

    /// Make an item a child of the sibling above it
    Indent(RowArgs),

    /// Move an item up one level
    Outdent(RowArgs),

    /// Swap an item with the sibling above it
    Up(RowArgs),

    /// Swap an item with the sibling below it
    Down(RowArgs),
}
