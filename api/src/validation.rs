use std::sync::LazyLock;

use regex::Regex;

use crate::{
    error::{AppError, AppResult},
    models::wishlist::{WishItemPayload, WishListPayload},
};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

const MIN_PASSWORD_LEN: usize = 8;
const MAX_LIST_NAME_LEN: usize = 100;
const MAX_ITEM_NAME_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 1000;
const MAX_URL_LEN: usize = 500;
const MAX_STATUS_LEN: usize = 50;

pub fn email(email: &str) -> AppResult<()> {
    if email.is_empty() {
        return Err(AppError::validation("email", "Email is required"));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(AppError::validation("email", "Invalid email format"));
    }
    Ok(())
}

pub fn password(password: &str) -> AppResult<()> {
    if password.is_empty() {
        return Err(AppError::validation("password", "Password is required"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
        ));
    }
    Ok(())
}

pub fn wishlist(payload: &WishListPayload) -> AppResult<()> {
    required("name", &payload.name, MAX_LIST_NAME_LEN)?;
    optional("description", payload.description.as_deref(), MAX_DESCRIPTION_LEN)?;
    optional("status", payload.status.as_deref(), MAX_STATUS_LEN)
}

pub fn wish_item(payload: &WishItemPayload) -> AppResult<()> {
    required("name", &payload.name, MAX_ITEM_NAME_LEN)?;
    optional("description", payload.description.as_deref(), MAX_DESCRIPTION_LEN)?;
    optional("url", payload.url.as_deref(), MAX_URL_LEN)?;
    optional("status", payload.status.as_deref(), MAX_STATUS_LEN)
}

fn required(field: &'static str, value: &str, max: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(field, format!("{field} is required")));
    }
    optional(field, Some(value), max)
}

fn optional(field: &'static str, value: Option<&str>, max: usize) -> AppResult<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(AppError::validation(
            field,
            format!("{field} must be at most {max} characters"),
        )),
        _ => Ok(()),
    }
}
