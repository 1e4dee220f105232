use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use actix_multipart::Field;
use actix_web::web;
use futures_util::StreamExt;
use uuid::Uuid;

use crate::error::ServiceError;

const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

fn extension(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}

pub fn allowed_file(filename: &str) -> bool {
    extension(filename)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Runs the filename checks in the order clients see them reported.
pub fn validate_filename(filename: &str) -> Result<(), ServiceError> {
    if filename.is_empty() {
        return Err(ServiceError::NoSelectedFile);
    }
    if !allowed_file(filename) {
        return Err(ServiceError::InvalidFileType);
    }
    Ok(())
}

/// Name the upload is stored under inside the upload directory.
///
/// Directory components sent by the client are dropped so the file always
/// lands directly in the upload directory.
pub fn stored_file_name(filename: &str, unique: bool) -> Result<String, ServiceError> {
    let name = Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or(ServiceError::NoSelectedFile)?;

    if unique {
        let ext = extension(name).unwrap_or_default().to_ascii_lowercase();
        Ok(format!("{}.{}", Uuid::new_v4(), ext))
    } else {
        Ok(name.to_string())
    }
}

/// Creates the upload directory and any missing parents. Existing directories are fine.
pub fn ensure_upload_dir(path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)
}

/// Streams a multipart field to `path`, replacing any existing file.
pub async fn save_field(field: &mut Field, path: PathBuf) -> Result<(), ServiceError> {
    let mut f = web::block(move || File::create(path)).await??;

    while let Some(chunk) = field.next().await {
        let data = chunk?;
        f = web::block(move || f.write_all(&data).map(|_| f)).await??;
    }

    web::block(move || f.sync_all()).await??;
    Ok(())
}
