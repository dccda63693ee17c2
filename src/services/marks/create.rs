use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{MarkService, resolve_grade};
use crate::models::marks::requests::{CreateMarkRequest, NewMark};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, current_user, internal_error, load_student};
use crate::services::courses::load_course;
use crate::utils::validate::validate_score;

pub async fn create_mark(
    service: &MarkService,
    body: CreateMarkRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let teacher = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if let Err(msg) = validate_score(body.score) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);
    let course = match load_course(&storage, body.course_id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = load_student(&storage, body.student_id).await {
        return Ok(resp);
    }

    let subject_name = body
        .subject_name
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| course.title.clone());

    let mark = NewMark {
        student_id: body.student_id,
        course_id: course.id,
        subject_name,
        score: body.score,
        grade: resolve_grade(body.score, body.grade.as_deref()),
        uploaded_by: teacher.id,
    };

    match storage.create_mark(mark).await {
        Ok(mark) => {
            info!("Mark {} recorded for student {}", mark.id, mark.student_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(mark, "Mark created successfully")))
        }
        Err(e) => Ok(internal_error(ErrorCode::InternalServerError, "Failed to create mark", e)),
    }
}
