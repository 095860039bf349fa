use serde::{Deserialize, Serialize};

use crate::db::{CategoryId, NoteId};
use crate::error::ApiError;

/// `GET /notes?categoryId=`. An empty value is treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct NotesQuery {
    #[serde(rename = "categoryId")]
    pub category_id: Option<String>,
}

impl NotesQuery {
    pub fn category(&self) -> Result<Option<CategoryId>, ApiError> {
        match self.category_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse::<CategoryId>()
                .map(Some)
                .map_err(|_| ApiError::Validation(format!("invalid categoryId: {raw:?}"))),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NoteCreated {
    pub message: &'static str,
    #[serde(rename = "noteId")]
    pub note_id: NoteId,
}
