//! `Path` and `Query` extractors that reject with `AppError`, so malformed
//! parameters get the same JSON error body as every other failure.

use axum::extract::{FromRequestParts, Path, Query};

use crate::errors::AppError;

#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
