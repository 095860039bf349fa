use tracing::info;

use crate::{
    categories::repo_types::ALL_CATEGORY_ID,
    db::{CategoryId, NoteId, UserId},
    error::{ApiError, ApiResult},
    notes::{
        repo::NoteRepo,
        repo_types::{NoteFields, NoteWithCategory},
    },
};

const MAX_TITLE_CHARS: usize = 200;

/// Maps the synthetic "All" id to "no category". It must never reach storage
/// as a real id.
pub fn real_category(id: Option<CategoryId>) -> Option<CategoryId> {
    id.filter(|id| *id != ALL_CATEGORY_ID)
}

fn prepare(mut fields: NoteFields) -> ApiResult<NoteFields> {
    let len = fields.title.trim().chars().count();
    if len == 0 || len > MAX_TITLE_CHARS {
        return Err(ApiError::Validation(format!(
            "note title must be 1-{MAX_TITLE_CHARS} characters"
        )));
    }
    fields.category_id = real_category(fields.category_id);
    Ok(fields)
}

pub async fn list(
    notes: &dyn NoteRepo,
    user_id: UserId,
    category: Option<CategoryId>,
) -> ApiResult<Vec<NoteWithCategory>> {
    Ok(notes.list(user_id, real_category(category)).await?)
}

pub async fn create(notes: &dyn NoteRepo, user_id: UserId, fields: NoteFields) -> ApiResult<NoteId> {
    let fields = prepare(fields)?;
    let id = notes.create(user_id, &fields).await?;
    info!(user_id, note_id = id, category_id = ?fields.category_id, "note created");
    Ok(id)
}

pub async fn update(
    notes: &dyn NoteRepo,
    user_id: UserId,
    id: NoteId,
    fields: NoteFields,
) -> ApiResult<()> {
    let fields = prepare(fields)?;
    notes.update(user_id, id, &fields).await?;
    Ok(())
}

pub async fn delete(notes: &dyn NoteRepo, user_id: UserId, id: NoteId) -> ApiResult<()> {
    notes.delete(user_id, id).await?;
    info!(user_id, note_id = id, "note deleted");
    Ok(())
}
