use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentPortalService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, internal_error};
use crate::services::internal_marks::list::student_internal_marks_response;
use crate::services::students::get::{attendance_response, marks_response};

pub async fn my_marks(
    service: &StudentPortalService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(marks_response(&service.get_storage(request), &user, user.id).await)
}

pub async fn my_attendance(
    service: &StudentPortalService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(attendance_response(&service.get_storage(request), &user, user.id).await)
}

pub async fn my_internal_marks(
    service: &StudentPortalService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(student_internal_marks_response(&service.get_storage(request), &user, user.id).await)
}

pub async fn my_courses(
    service: &StudentPortalService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match service.get_storage(request).list_student_courses(user.id).await {
        Ok(courses) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            courses,
            "Courses retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve courses",
            e,
        )),
    }
}
