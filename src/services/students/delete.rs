use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{internal_error, load_student};

pub async fn delete_student(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    if let Err(resp) = load_student(&storage, student_id).await {
        return Ok(resp);
    }

    match storage.delete_user(student_id).await {
        Ok(true) => {
            RequireJWT::invalidate_user(request, student_id).await;
            info!("Student {} deleted", student_id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Student deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Student deletion failed",
            e,
        )),
    }
}
