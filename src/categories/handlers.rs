use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::AuthUser,
    categories::{
        dto::CategoryCreated,
        repo_types::{CategoryFields, CategoryWithCount},
        services,
    },
    db::CategoryId,
    error::ApiResult,
    extract::{ApiJson, ApiPath},
    response::MessageResponse,
    state::AppState,
};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            put(update_category).delete(delete_category),
        )
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<CategoryWithCount>>> {
    let categories =
        services::list_with_all(state.categories.as_ref(), state.notes.as_ref(), user_id).await?;
    Ok(Json(categories))
}

#[instrument(skip(state, fields))]
pub async fn create_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(fields): ApiJson<CategoryFields>,
) -> ApiResult<(StatusCode, Json<CategoryCreated>)> {
    let category_id = services::create(state.categories.as_ref(), user_id, &fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(CategoryCreated {
            message: "category created",
            category_id,
        }),
    ))
}

#[instrument(skip(state, fields))]
pub async fn update_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<CategoryId>,
    ApiJson(fields): ApiJson<CategoryFields>,
) -> ApiResult<Json<MessageResponse>> {
    services::update(state.categories.as_ref(), user_id, id, &fields).await?;
    Ok(Json(MessageResponse::new("category updated")))
}

#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<CategoryId>,
) -> ApiResult<Json<MessageResponse>> {
    services::delete(state.categories.as_ref(), user_id, id).await?;
    Ok(Json(MessageResponse::new("category deleted")))
}
