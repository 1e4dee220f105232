use std::path::PathBuf;

use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{web, HttpResponse, Result};
use futures_util::StreamExt;

use crate::classifier::Classifier;
use crate::error::ServiceError;
use crate::models::{EchoResponse, MessageResponse, UploadResponse};
use crate::upload;

/// Everything the handlers share, built once at startup.
pub struct AppState {
    pub classifier: Classifier,
    pub upload_dir: PathBuf,
    pub index_path: PathBuf,
    pub unique_filenames: bool,
}

pub async fn get_example() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        message: "Este es un ejemplo de respuesta GET".to_string(),
    })
}

pub async fn post_example(payload: web::Json<serde_json::Value>) -> HttpResponse {
    HttpResponse::Ok().json(EchoResponse {
        message: "Datos recibidos correctamente".to_string(),
        data: payload.into_inner(),
    })
}

pub async fn upload_image(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, ServiceError> {
    let mut saved: Option<PathBuf> = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;

        let disposition = field.content_disposition();
        let is_file_part = saved.is_none() && disposition.get_name() == Some("file");
        // A part without a filename is a plain form value, not a file.
        let filename = match disposition.get_filename().map(str::to_owned) {
            Some(name) if is_file_part => name,
            _ => {
                // Other parts are drained so the stream can advance.
                while let Some(chunk) = field.next().await {
                    chunk?;
                }
                continue;
            }
        };
        upload::validate_filename(&filename)?;

        let stored = upload::stored_file_name(&filename, state.unique_filenames)?;
        let filepath = state.upload_dir.join(stored);
        upload::save_field(&mut field, filepath.clone()).await?;
        log::debug!("Saved upload to {}", filepath.display());

        saved = Some(filepath);
    }

    let filepath = saved.ok_or(ServiceError::NoFilePart)?;

    let state_for_block = state.clone();
    let path_for_block = filepath.clone();
    let prediction =
        web::block(move || state_for_block.classifier.classify_file(&path_for_block)).await??;

    log::info!(
        "Predicted class {} ({}) with {:.2}% for {}",
        prediction.index,
        prediction.label,
        prediction.confidence_percent(),
        filepath.display()
    );

    Ok(HttpResponse::Ok().json(UploadResponse {
        message: prediction.message(),
        file_path: filepath.to_string_lossy().into_owned(),
    }))
}

pub async fn serve_interface(state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let index_path = state.index_path.clone();
    let body = web::block(move || std::fs::read(index_path))
        .await?
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ServiceError::NotFound,
            _ => ServiceError::Io(e),
        })?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

pub async fn redirect_to_api_root() -> HttpResponse {
    HttpResponse::PermanentRedirect()
        .insert_header((header::LOCATION, "/api/"))
        .finish()
}

pub async fn not_found() -> Result<HttpResponse, ServiceError> {
    Err(ServiceError::NotFound)
}
