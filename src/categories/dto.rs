use serde::Serialize;

use crate::db::CategoryId;

#[derive(Debug, Serialize)]
pub struct CategoryCreated {
    pub message: &'static str,
    #[serde(rename = "categoryId")]
    pub category_id: CategoryId,
}
