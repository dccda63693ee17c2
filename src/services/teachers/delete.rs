use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use super::get::load_teacher;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, current_user, internal_error};

pub async fn delete_teacher(
    service: &TeacherService,
    teacher_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let admin = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if admin.id == teacher_id {
        return Ok(bad_request(ErrorCode::BadRequest, "You cannot delete your own account"));
    }

    let storage = service.get_storage(request);
    if let Err(resp) = load_teacher(&storage, teacher_id).await {
        return Ok(resp);
    }

    match storage.delete_user(teacher_id).await {
        Ok(true) => {
            RequireJWT::invalidate_user(request, teacher_id).await;
            info!("Teacher {} deleted by admin {}", teacher_id, admin.id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Teacher deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TeacherNotFound,
            "Teacher not found",
        ))),
        Err(e) => Ok(internal_error(ErrorCode::InternalServerError, "Failed to delete teacher", e)),
    }
}
