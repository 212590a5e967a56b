//! JSON body extractor whose rejections go through `AppError`.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::types::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                AppError::Validation(rejection.body_text())
            }
            _ => AppError::InvalidRequest(rejection.body_text()),
        }
    }
}
