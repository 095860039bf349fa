use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::CategoryId;

/// Reserved id of the synthetic "All notes" category. Identity columns start
/// at 1, so no stored category can ever have this id.
pub const ALL_CATEGORY_ID: CategoryId = 0;
pub const ALL_CATEGORY_NAME: &str = "All";
pub const ALL_CATEGORY_ICON: &str = "star";
pub const ALL_CATEGORY_COLOR: &str = "#cd1111ff";

/// A category visible to the requesting user, with the number of that
/// user's notes filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CategoryWithCount {
    pub id: CategoryId,
    pub name: String,
    pub icon: String,
    pub theme_color: String,
    #[serde(rename = "noteCount")]
    pub note_count: i64,
}

impl CategoryWithCount {
    /// The synthetic entry covering every note the user owns.
    pub fn all_notes(total: i64) -> Self {
        Self {
            id: ALL_CATEGORY_ID,
            name: ALL_CATEGORY_NAME.to_owned(),
            icon: ALL_CATEGORY_ICON.to_owned(),
            theme_color: ALL_CATEGORY_COLOR.to_owned(),
            note_count: total,
        }
    }
}

/// Editable attributes of a category; also the create/update request body.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryFields {
    pub name: String,
    pub icon: String,
    pub theme_color: String,
}
