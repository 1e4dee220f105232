use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("No file part in the request")]
    NoFilePart,
    #[error("No selected file")]
    NoSelectedFile,
    #[error("Invalid file type. Only png, jpg, jpeg, gif are allowed.")]
    InvalidFileType,
    #[error("Invalid image file")]
    InvalidImage(#[source] image::ImageError),
    #[error("Recurso no encontrado")]
    NotFound,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Upload stream failed: {0}")]
    Multipart(String),
    #[error("Inference error: {0}")]
    Inference(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NoFilePart
            | ServiceError::NoSelectedFile
            | ServiceError::InvalidFileType
            | ServiceError::InvalidImage(_)
            | ServiceError::Multipart(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Io(_) | ServiceError::Inference(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if !self.is_client_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

impl From<actix_multipart::MultipartError> for ServiceError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        use actix_multipart::MultipartError;

        match err {
            // Anything that is not multipart/form-data carries no file part.
            MultipartError::NoContentType
            | MultipartError::ParseContentType
            | MultipartError::Boundary => ServiceError::NoFilePart,
            other => ServiceError::Multipart(other.to_string()),
        }
    }
}

impl From<actix_web::error::BlockingError> for ServiceError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}
