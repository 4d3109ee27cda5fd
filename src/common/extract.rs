// src/common/extract.rs

use axum::extract::FromRequest;

use crate::common::error::AppError;

/// `Json` de entrada cujas rejeições viram `AppError` (400).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
