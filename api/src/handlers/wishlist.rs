use axum::{extract::State, http::StatusCode, Json};

use super::{AppJson, AppPath};
use crate::{
    auth::AuthUser,
    error::AppResult,
    models::wishlist::{WishItem, WishItemPayload, WishList, WishListPayload},
    AppState,
};

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<WishListPayload>,
) -> AppResult<(StatusCode, Json<WishList>)> {
    let list = state.wishlists.create_list(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<WishList>>> {
    Ok(Json(state.wishlists.list_lists(user_id).await?))
}

pub async fn get(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(list_id): AppPath<i64>,
) -> AppResult<Json<WishList>> {
    Ok(Json(state.wishlists.get_list(user_id, list_id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(list_id): AppPath<i64>,
    AppJson(payload): AppJson<WishListPayload>,
) -> AppResult<Json<WishList>> {
    Ok(Json(
        state.wishlists.update_list(user_id, list_id, payload).await?,
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(list_id): AppPath<i64>,
) -> AppResult<StatusCode> {
    state.wishlists.delete_list(user_id, list_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(list_id): AppPath<i64>,
    AppJson(payload): AppJson<WishItemPayload>,
) -> AppResult<(StatusCode, Json<WishItem>)> {
    let item = state.wishlists.add_item(user_id, list_id, payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath((list_id, item_id)): AppPath<(i64, i64)>,
) -> AppResult<Json<WishItem>> {
    Ok(Json(
        state.wishlists.get_item(user_id, list_id, item_id).await?,
    ))
}

pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath((list_id, item_id)): AppPath<(i64, i64)>,
    AppJson(payload): AppJson<WishItemPayload>,
) -> AppResult<Json<WishItem>> {
    Ok(Json(
        state
            .wishlists
            .update_item(user_id, list_id, item_id, payload)
            .await?,
    ))
}

pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath((list_id, item_id)): AppPath<(i64, i64)>,
) -> AppResult<StatusCode> {
    state
        .wishlists
        .delete_item(user_id, list_id, item_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
