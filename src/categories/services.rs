use tracing::info;

use crate::{
    categories::{
        repo::CategoryRepo,
        repo_types::{CategoryFields, CategoryWithCount},
    },
    db::{CategoryId, UserId},
    error::{ApiError, ApiResult},
    notes::repo::NoteRepo,
};

const MAX_NAME_CHARS: usize = 100;

fn validate(fields: &CategoryFields) -> ApiResult<()> {
    let len = fields.name.trim().chars().count();
    if len == 0 || len > MAX_NAME_CHARS {
        return Err(ApiError::Validation(format!(
            "category name must be 1-{MAX_NAME_CHARS} characters"
        )));
    }
    Ok(())
}

/// The synthetic "All" entry followed by every category visible to the user.
///
/// The total and the per-category counts come from two separate reads, so a
/// concurrent write may leave them momentarily out of step.
pub async fn list_with_all(
    categories: &dyn CategoryRepo,
    notes: &dyn NoteRepo,
    user_id: UserId,
) -> ApiResult<Vec<CategoryWithCount>> {
    let visible = categories.list_visible(user_id).await?;
    let total = notes.count(user_id).await?;

    let mut out = Vec::with_capacity(visible.len() + 1);
    out.push(CategoryWithCount::all_notes(total));
    out.extend(visible);
    Ok(out)
}

pub async fn create(
    categories: &dyn CategoryRepo,
    user_id: UserId,
    fields: &CategoryFields,
) -> ApiResult<CategoryId> {
    validate(fields)?;
    let id = categories.create(user_id, fields).await?;
    info!(user_id, category_id = id, "category created");
    Ok(id)
}

pub async fn update(
    categories: &dyn CategoryRepo,
    user_id: UserId,
    id: CategoryId,
    fields: &CategoryFields,
) -> ApiResult<()> {
    validate(fields)?;
    categories.update(user_id, id, fields).await?;
    Ok(())
}

pub async fn delete(categories: &dyn CategoryRepo, user_id: UserId, id: CategoryId) -> ApiResult<()> {
    categories.delete(user_id, id).await?;
    info!(user_id, category_id = id, "category deleted");
    Ok(())
}
