use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, check_can_manage, load_course};
use crate::models::courses::entities::{Assignment, Exam};
use crate::models::courses::requests::{CreateAssignmentRequest, CreateExamRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, current_user, internal_error};

fn validate_max_marks(max_marks: f64) -> Result<(), &'static str> {
    if !max_marks.is_finite() || max_marks <= 0.0 {
        return Err("Max marks must be a positive number");
    }
    Ok(())
}

pub async fn add_assignment(
    service: &CourseService,
    course_id: i64,
    body: CreateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if body.title.trim().is_empty() {
        return Ok(bad_request(ErrorCode::ValidationFailed, "Assignment title is required"));
    }
    if let Err(msg) = validate_max_marks(body.max_marks) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);
    let course = match load_course(&storage, course_id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = check_can_manage(&user, &course) {
        return Ok(resp);
    }

    let assignment = Assignment {
        title: body.title.trim().to_string(),
        description: body.description,
        due_date: body.due_date,
        max_marks: body.max_marks,
    };
    match storage.add_course_assignment(course.id, assignment).await {
        Ok(Some(course)) => Ok(HttpResponse::Created().json(ApiResponse::success(
            course,
            "Assignment added successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(internal_error(ErrorCode::InternalServerError, "Failed to add assignment", e)),
    }
}

pub async fn add_exam(
    service: &CourseService,
    course_id: i64,
    body: CreateExamRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if body.name.trim().is_empty() {
        return Ok(bad_request(ErrorCode::ValidationFailed, "Exam name is required"));
    }
    if let Err(msg) = validate_max_marks(body.max_marks) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);
    let course = match load_course(&storage, course_id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = check_can_manage(&user, &course) {
        return Ok(resp);
    }

    let exam = Exam {
        name: body.name.trim().to_string(),
        date: body.date,
        max_marks: body.max_marks,
    };
    match storage.add_course_exam(course.id, exam).await {
        Ok(Some(course)) => Ok(HttpResponse::Created().json(ApiResponse::success(
            course,
            "Exam added successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(internal_error(ErrorCode::InternalServerError, "Failed to add exam", e)),
    }
}
