//! Request extractors whose rejections render as `INVALID_INPUT`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::http::error::AppError;

/// JSON body extractor.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
