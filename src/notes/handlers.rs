use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::AuthUser,
    db::NoteId,
    error::ApiResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    notes::{
        dto::{NoteCreated, NotesQuery},
        repo_types::{NoteFields, NoteWithCategory},
        services,
    },
    response::MessageResponse,
    state::AppState,
};

pub fn note_routes() -> Router<AppState> {
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/:id", put(update_note).delete(delete_note))
}

#[instrument(skip(state))]
pub async fn list_notes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiQuery(query): ApiQuery<NotesQuery>,
) -> ApiResult<Json<Vec<NoteWithCategory>>> {
    let notes = services::list(state.notes.as_ref(), user_id, query.category()?).await?;
    Ok(Json(notes))
}

#[instrument(skip(state, fields))]
pub async fn create_note(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(fields): ApiJson<NoteFields>,
) -> ApiResult<(StatusCode, Json<NoteCreated>)> {
    let note_id = services::create(state.notes.as_ref(), user_id, fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(NoteCreated {
            message: "note created",
            note_id,
        }),
    ))
}

#[instrument(skip(state, fields))]
pub async fn update_note(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<NoteId>,
    ApiJson(fields): ApiJson<NoteFields>,
) -> ApiResult<Json<MessageResponse>> {
    services::update(state.notes.as_ref(), user_id, id, fields).await?;
    Ok(Json(MessageResponse::new("note updated")))
}

#[instrument(skip(state))]
pub async fn delete_note(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<NoteId>,
) -> ApiResult<Json<MessageResponse>> {
    services::delete(state.notes.as_ref(), user_id, id).await?;
    Ok(Json(MessageResponse::new("note deleted")))
}
