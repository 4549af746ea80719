use axum::{extract::State, http::StatusCode, Json};

use super::AppJson;
use crate::{
    auth::AuthUser,
    error::AppResult,
    models::user::{AuthResponse, CreateUser, LoginPayload, RegisterResponse, User},
    AppState,
};

pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUser>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let user = state.auth.register(payload).await?;
    let issued = state.auth.issue_session(user.id)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginPayload>,
) -> AppResult<Json<AuthResponse>> {
    let issued = state.auth.login(payload).await?;

    Ok(Json(AuthResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<User>> {
    Ok(Json(state.auth.current_user(user_id).await?))
}
