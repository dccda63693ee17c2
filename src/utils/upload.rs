//! multipart 文件落盘
//!
//! 扩展名白名单 + 首块魔术字节 + 累计大小校验，任一失败即删除已写入的文件。

use actix_multipart::Field;
use actix_web::HttpResponse;
use futures_util::StreamExt;
use std::fs::{self, File};
use std::io::Write;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::CampusError;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::file_magic::{extension_of, validate_magic_bytes};

/// 已保存的上传文件
#[derive(Debug, Clone)]
pub struct SavedUpload {
    pub original_name: String,
    pub stored_name: String,
    pub file_size: i64,
}

impl SavedUpload {
    pub fn public_url(&self) -> String {
        AppConfig::get().upload_public_url(&self.stored_name)
    }
}

fn upload_error(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

fn upload_failed(err: impl std::fmt::Display) -> HttpResponse {
    tracing::error!("{}", CampusError::file_operation(err.to_string()));
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::FileUploadFailed,
        "Failed to save uploaded file",
    ))
}

/// 扩展名是否在白名单内（白名单项可带或不带点号）
pub fn extension_allowed<S: AsRef<str>>(extension: &str, allowed: &[S]) -> bool {
    let ext = extension.trim_start_matches('.');
    allowed
        .iter()
        .any(|t| t.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// 把文件字段写入上传目录
pub async fn save_file_field<S: AsRef<str>>(
    field: &mut Field,
    allowed_extensions: &[S],
) -> Result<SavedUpload, HttpResponse> {
    let config = AppConfig::get();
    let max_size = config.upload.max_size;

    let original_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(|s| s.to_string())
        .unwrap_or_default();

    let extension = match extension_of(&original_name) {
        Some(ext) if extension_allowed(&ext, allowed_extensions) => ext,
        _ => return Err(upload_error(ErrorCode::FileTypeNotAllowed, "File type not allowed")),
    };

    fs::create_dir_all(&config.upload.dir).map_err(upload_failed)?;

    let stored_name = format!("{}-{}{}", chrono::Utc::now().timestamp(), Uuid::new_v4(), extension);
    let file_path = config.upload_file_path(&stored_name);
    let mut file = File::create(&file_path).map_err(upload_failed)?;

    let mut total_size: usize = 0;
    let mut first_chunk = true;
    while let Some(chunk) = field.next().await {
        let data = match chunk {
            Ok(data) => data,
            Err(e) => {
                let _ = fs::remove_file(&file_path);
                return Err(upload_failed(e));
            }
        };

        if first_chunk {
            first_chunk = false;
            if !validate_magic_bytes(&data, &extension) {
                let _ = fs::remove_file(&file_path);
                return Err(upload_error(
                    ErrorCode::FileTypeNotAllowed,
                    "File content does not match its extension",
                ));
            }
        }

        total_size += data.len();
        if total_size > max_size {
            let _ = fs::remove_file(&file_path);
            return Err(upload_error(
                ErrorCode::FileSizeExceeded,
                "File size exceeds the limit",
            ));
        }
        if let Err(e) = file.write_all(&data) {
            let _ = fs::remove_file(&file_path);
            return Err(upload_failed(e));
        }
    }

    if total_size == 0 {
        let _ = fs::remove_file(&file_path);
        return Err(upload_error(ErrorCode::FileUploadFailed, "Uploaded file is empty"));
    }

    Ok(SavedUpload {
        original_name,
        stored_name,
        file_size: total_size as i64,
    })
}

/// 读取文本字段
pub async fn read_text_field(field: &mut Field) -> Result<String, HttpResponse> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let data = chunk.map_err(|e| {
            upload_error(ErrorCode::BadRequest, &format!("Failed to read field: {e}"))
        })?;
        bytes.extend_from_slice(&data);
    }
    String::from_utf8(bytes)
        .map_err(|_| upload_error(ErrorCode::BadRequest, "Field is not valid UTF-8"))
}

/// 删除上传目录中的文件，文件不存在不算错误
pub fn remove_stored_file(stored_name: &str) {
    let path = AppConfig::get().upload_file_path(stored_name);
    match fs::remove_file(&path) {
        Ok(()) => tracing::debug!("Removed upload {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Failed to remove upload {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_allowed_ignores_dots_and_case() {
        assert!(extension_allowed(".PDF", &["pdf", "docx"]));
        assert!(extension_allowed(".png", &[".png", ".jpg"]));
        assert!(!extension_allowed(".exe", &["pdf"]));
        assert!(!extension_allowed(".pdf", &[] as &[&str]));
    }
}
