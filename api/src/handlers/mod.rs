use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

pub mod auth;
pub mod health;
pub mod metrics;
pub mod wishlist;

/// `Json` whose rejections become [`AppError::Validation`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Path` whose rejections become [`AppError::Validation`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
