use axum::extract::{FromRequest, FromRequestParts};
use shared::error::AppError;

/// `axum::Json` whose rejections are answered with the usual `{error}` body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Path` whose rejections are answered with the usual `{error}` body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
