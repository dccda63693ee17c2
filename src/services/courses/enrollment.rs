use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::{CourseService, load_course};
use crate::models::courses::requests::EnrollRequest;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, internal_error, load_student};
use crate::storage::Storage;

/// 按 studentId 或 USN 定位学生，两者都给时以 studentId 为准
async fn resolve_student(storage: &Arc<dyn Storage>, body: &EnrollRequest) -> Result<User, HttpResponse> {
    if let Some(student_id) = body.student_id {
        return load_student(storage, student_id).await;
    }

    let usn = body
        .usn
        .as_deref()
        .map(|u| u.trim().to_uppercase())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| bad_request(ErrorCode::ValidationFailed, "studentId or usn is required"))?;

    match storage.get_student_by_usn(&usn).await {
        Ok(Some(student)) => Ok(student),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => Err(internal_error(ErrorCode::InternalServerError, "Failed to load student", e)),
    }
}

pub async fn enroll(
    service: &CourseService,
    course_id: i64,
    body: EnrollRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let course = match load_course(&storage, course_id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };
    let student = match resolve_student(&storage, &body).await {
        Ok(student) => student,
        Err(resp) => return Ok(resp),
    };

    match storage.enroll_student(course.id, student.id).await {
        Ok(true) => {
            info!("Student {} enrolled in course {}", student.id, course.code);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                student,
                "Student enrolled successfully",
            )))
        }
        Ok(false) => Ok(bad_request(
            ErrorCode::AlreadyEnrolled,
            "Student is already enrolled in this course",
        )),
        Err(e) => Ok(internal_error(ErrorCode::InternalServerError, "Failed to enroll student", e)),
    }
}

pub async fn unenroll(
    service: &CourseService,
    course_id: i64,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    if let Err(resp) = load_course(&storage, course_id).await {
        return Ok(resp);
    }

    match storage.unenroll_student(course_id, student_id).await {
        Ok(true) => {
            info!("Student {} removed from course {}", student_id, course_id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Student unenrolled successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotEnrolled,
            "Student is not enrolled in this course",
        ))),
        Err(e) => Ok(internal_error(ErrorCode::InternalServerError, "Failed to unenroll student", e)),
    }
}
