use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use numscan_core::error::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Scanner '{0}' is not registered")]
    UnknownScanner(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Core(CoreError::InvalidNumber(_)) => StatusCode::BAD_REQUEST,
            ApiError::UnknownScanner(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}
