mod account;
mod config;
mod item;
mod sheet;

pub use self::account::{
    AccessToken, LoginRequest, ProfileUpdate, RefreshRequest, RegisterRequest, RegisterResponse,
    TokenPair, User,
};
pub use self::config::{ClientConfig, DEFAULT_API_BASE, SessionState};
pub use self::item::{
    ChecklistItem, CreateItemReply, ItemPatch, ItemStatus, NewItem, RowId, StatusParseError,
};
pub use self::sheet::{NewSheet, Sheet, SheetId};
