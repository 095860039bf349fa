use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::db::{CategoryId, NoteId, UserId};

/// A note joined with the display attributes of its category, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct NoteWithCategory {
    pub id: NoteId,
    pub user_id: UserId,
    pub category_id: Option<CategoryId>,
    pub title: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub category_name: Option<String>,
    pub category_theme_color: Option<String>,
}

/// Editable attributes of a note; also the create/update request body.
#[derive(Debug, Clone, Deserialize)]
pub struct NoteFields {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "categoryId", default)]
    pub category_id: Option<CategoryId>,
}
