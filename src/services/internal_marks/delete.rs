use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::InternalMarksService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, internal_error};

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::InternalMarksNotFound,
        "Internal marks not found",
    ))
}

pub async fn delete_internal_marks(
    service: &InternalMarksService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let teacher = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let record = match storage.get_internal_marks_by_id(id).await {
        Ok(Some(record)) => record,
        Ok(None) => return Ok(not_found()),
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to load internal marks",
                e,
            ));
        }
    };

    match storage.delete_internal_marks(id).await {
        Ok(true) => {
            info!(
                "CIE record {} (student {}, course {}) deleted by {}",
                record.id, record.student_id, record.course_id, teacher.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Internal marks deleted successfully",
            )))
        }
        Ok(false) => Ok(not_found()),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to delete internal marks",
            e,
        )),
    }
}
