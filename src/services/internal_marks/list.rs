use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::InternalMarksService;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{check_student_access, current_user, internal_error, load_student};
use crate::storage::Storage;

pub async fn list_by_course(
    service: &InternalMarksService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_course_by_id(course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            return Ok(internal_error(ErrorCode::InternalServerError, "Failed to load course", e));
        }
    }

    match storage.list_internal_marks_by_course(course_id).await {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            records,
            "Internal marks retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve internal marks",
            e,
        )),
    }
}

pub async fn list_by_student(
    service: &InternalMarksService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let viewer = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(student_internal_marks_response(&service.get_storage(request), &viewer, student_id).await)
}

/// 学生 CIE 列表（含归属校验），学生自助与家长查看共用
pub(crate) async fn student_internal_marks_response(
    storage: &Arc<dyn Storage>,
    viewer: &User,
    student_id: i64,
) -> HttpResponse {
    if let Err(resp) = check_student_access(storage, viewer, student_id).await {
        return resp;
    }
    if let Err(resp) = load_student(storage, student_id).await {
        return resp;
    }

    match storage.list_internal_marks_by_student(student_id).await {
        Ok(records) => HttpResponse::Ok().json(ApiResponse::success(
            records,
            "Internal marks retrieved successfully",
        )),
        Err(e) => internal_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve internal marks",
            e,
        ),
    }
}
