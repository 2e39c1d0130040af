use serde::{Deserialize, Serialize};

/// Sheets are addressed by the UUID the backend assigns, kept opaque here.
pub type SheetId = String;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub id: SheetId,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct NewSheet {
    pub name: String,
}
