use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::create::{check_code_available, check_teacher_exists, validate_course_fields};
use super::{CourseService, check_can_manage, load_course};
use crate::models::courses::requests::UpdateCourseRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, current_user, internal_error};

pub async fn update_course(
    service: &CourseService,
    id: i64,
    body: UpdateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if let Err(msg) = validate_course_fields(
        body.code.as_deref(),
        body.title.as_deref(),
        body.credits,
        body.semester,
    ) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);
    let course = match load_course(&storage, id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = check_can_manage(&user, &course) {
        return Ok(resp);
    }

    if let Some(code) = &body.code
        && let Err(resp) = check_code_available(&storage, code, Some(id)).await
    {
        return Ok(resp);
    }
    if let Some(teacher_id) = body.teacher_id
        && Some(teacher_id) != course.teacher_id
    {
        if !user.is_admin() {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::CoursePermissionDenied,
                "Only administrators can reassign a course",
            )));
        }
        if let Err(resp) = check_teacher_exists(&storage, teacher_id).await {
            return Ok(resp);
        }
    }

    match storage.update_course(id, body).await {
        Ok(Some(course)) => {
            info!("Course {} updated by {}", course.id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(course, "Course updated successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(internal_error(ErrorCode::InternalServerError, "Failed to update course", e)),
    }
}
