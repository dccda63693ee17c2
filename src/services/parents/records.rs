//! 家长查看子女记录，归属由 `check_student_access` 校验

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ParentService;
use crate::services::access::current_user;
use crate::services::internal_marks::list::student_internal_marks_response;
use crate::services::students::get::{attendance_response, marks_response};

pub async fn child_marks(
    service: &ParentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let parent = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(marks_response(&service.get_storage(request), &parent, student_id).await)
}

pub async fn child_attendance(
    service: &ParentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let parent = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(attendance_response(&service.get_storage(request), &parent, student_id).await)
}

pub async fn child_internal_marks(
    service: &ParentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let parent = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(student_internal_marks_response(&service.get_storage(request), &parent, student_id).await)
}
