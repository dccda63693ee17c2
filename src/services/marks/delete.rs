use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::MarkService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, internal_error};

fn mark_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::MarkNotFound, "Mark not found"))
}

pub async fn delete_mark(
    service: &MarkService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let teacher = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let mark = match storage.get_mark_by_id(id).await {
        Ok(Some(mark)) => mark,
        Ok(None) => return Ok(mark_not_found()),
        Err(e) => return Ok(internal_error(ErrorCode::InternalServerError, "Failed to load mark", e)),
    };

    match storage.delete_mark(id).await {
        Ok(true) => {
            info!(
                "Mark {} ({} / course {}) deleted by {}",
                mark.id, mark.student_id, mark.course_id, teacher.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Mark deleted successfully",
            )))
        }
        Ok(false) => Ok(mark_not_found()),
        Err(e) => Ok(internal_error(ErrorCode::InternalServerError, "Failed to delete mark", e)),
    }
}
