use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{Credentials, LoginResponse, PublicUser, RegisterResponse},
        services,
    },
    error::ApiResult,
    extract::ApiJson,
    response::MessageResponse,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn reset_routes() -> Router<AppState> {
    Router::new().route("/reset-password", post(reset_password))
}

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Credentials>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let user_id =
        services::register(state.users.as_ref(), &payload.username, &payload.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "user registered",
            user_id,
        }),
    ))
}

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Credentials>,
) -> ApiResult<Json<LoginResponse>> {
    let user =
        services::authenticate(state.users.as_ref(), &payload.username, &payload.password).await?;
    let token = state.keys.sign(user.id)?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(LoginResponse {
        message: "login successful",
        token,
        user: PublicUser {
            id: user.id,
            username: user.username,
        },
    }))
}

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Credentials>,
) -> ApiResult<Json<MessageResponse>> {
    services::reset_password(state.users.as_ref(), &payload.username, &payload.password).await?;
    Ok(Json(MessageResponse::new("password reset")))
}
