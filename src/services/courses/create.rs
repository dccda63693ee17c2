use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::CourseService;
use crate::models::courses::requests::CreateCourseRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, current_user, internal_error};
use crate::storage::Storage;
use crate::utils::validate::{validate_course_code, validate_credits, validate_name, validate_semester};

pub(crate) fn validate_course_fields(
    code: Option<&str>,
    title: Option<&str>,
    credits: Option<i32>,
    semester: Option<i32>,
) -> Result<(), &'static str> {
    if let Some(code) = code {
        validate_course_code(code)?;
    }
    if let Some(title) = title {
        validate_name(title).map_err(|_| "Course title must be 1-100 characters")?;
    }
    if let Some(credits) = credits {
        validate_credits(credits)?;
    }
    if let Some(semester) = semester {
        validate_semester(semester)?;
    }
    Ok(())
}

/// 课程代码唯一（`exclude` 为当前课程 ID）
pub(crate) async fn check_code_available(
    storage: &Arc<dyn Storage>,
    code: &str,
    exclude: Option<i64>,
) -> Result<(), HttpResponse> {
    match storage.get_course_by_code(&code.trim().to_uppercase()).await {
        Ok(Some(existing)) if Some(existing.id) != exclude => Err(bad_request(
            ErrorCode::CourseCodeAlreadyExists,
            "Course code already exists",
        )),
        Ok(_) => Ok(()),
        Err(e) => Err(internal_error(ErrorCode::InternalServerError, "Failed to check course code", e)),
    }
}

/// 指定的授课教师必须存在
pub(crate) async fn check_teacher_exists(
    storage: &Arc<dyn Storage>,
    teacher_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_id(teacher_id).await {
        Ok(Some(user)) if user.is_teacher() => Ok(()),
        Ok(_) => Err(bad_request(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => Err(internal_error(ErrorCode::InternalServerError, "Failed to load teacher", e)),
    }
}

pub async fn create_course(
    service: &CourseService,
    mut body: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if let Err(msg) = validate_course_fields(
        Some(&body.code),
        Some(&body.title),
        Some(body.credits),
        Some(body.semester),
    ) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);
    if let Err(resp) = check_code_available(&storage, &body.code, None).await {
        return Ok(resp);
    }

    // 未指定时由创建者授课；替他人开课需要管理员
    match body.teacher_id {
        None => body.teacher_id = Some(user.id),
        Some(teacher_id) if teacher_id != user.id => {
            if !user.is_admin() {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::CoursePermissionDenied,
                    "Only administrators can assign courses to other teachers",
                )));
            }
            if let Err(resp) = check_teacher_exists(&storage, teacher_id).await {
                return Ok(resp);
            }
        }
        Some(_) => {}
    }

    match storage.create_course(body).await {
        Ok(course) => {
            info!("Course {} created by {}", course.code, user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(course, "Course created successfully")))
        }
        Err(e) => Ok(internal_error(ErrorCode::InternalServerError, "Failed to create course", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_field_validation() {
        assert!(validate_course_fields(Some("CS501"), Some("DBMS"), Some(4), Some(5)).is_ok());
        assert!(validate_course_fields(Some("C"), None, None, None).is_err());
        assert!(validate_course_fields(None, Some("  "), None, None).is_err());
        assert!(validate_course_fields(None, None, Some(0), None).is_err());
        assert!(validate_course_fields(None, None, None, Some(9)).is_err());
        assert!(validate_course_fields(None, None, None, None).is_ok());
    }
}
