use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MarkService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, internal_error};
use crate::services::courses::load_course;
use crate::services::students::get::marks_response;

pub async fn list_by_student(
    service: &MarkService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let viewer = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(marks_response(&service.get_storage(request), &viewer, student_id).await)
}

pub async fn list_by_course(
    service: &MarkService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    if let Err(resp) = load_course(&storage, course_id).await {
        return Ok(resp);
    }

    match storage.list_marks_by_course(course_id).await {
        Ok(marks) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            marks,
            "Marks retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(ErrorCode::InternalServerError, "Failed to retrieve marks", e)),
    }
}
