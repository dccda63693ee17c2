use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header, web};
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::CampusError;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::file_magic::{content_type_for, extension_of};

/// 只接受单级文件名，拒绝目录穿越
fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains(['/', '\\', '\0'])
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::FileNotFound, "File not found"))
}

pub async fn serve_upload(file_name: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
    if !is_safe_file_name(&file_name) {
        debug!("Rejected upload path {:?} from {:?}", file_name, request.peer_addr());
        return Ok(not_found());
    }

    let path = AppConfig::get().upload_file_path(&file_name);
    let read_path = path.clone();
    let bytes = match web::block(move || std::fs::read(read_path)).await? {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(not_found()),
        Err(e) => {
            tracing::error!("{}", CampusError::file_operation(format!("{}: {e}", path.display())));
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "File read failed",
            )));
        }
    };

    let content_type = extension_of(&file_name)
        .map(|ext| content_type_for(&ext))
        .unwrap_or("application/octet-stream");

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type))
        .insert_header((header::CACHE_CONTROL, "private, max-age=3600"))
        .insert_header(("X-Content-Type-Options", "nosniff"))
        .body(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_rejects_traversal() {
        assert!(is_safe_file_name("1700000000-4f1c.png"));
        assert!(!is_safe_file_name("../config.toml"));
        assert!(!is_safe_file_name("nested/file.pdf"));
        assert!(!is_safe_file_name("..\\secret"));
        assert!(!is_safe_file_name(""));
    }
}
