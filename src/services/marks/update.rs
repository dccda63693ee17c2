use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{MarkService, resolve_grade};
use crate::models::marks::requests::UpdateMarkRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, internal_error};
use crate::utils::validate::validate_score;

pub async fn update_mark(
    service: &MarkService,
    id: i64,
    mut body: UpdateMarkRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if body.subject_name.is_none() && body.score.is_none() && body.grade.is_none() {
        return Ok(bad_request(ErrorCode::BadRequest, "No fields to update"));
    }
    if let Some(score) = body.score
        && let Err(msg) = validate_score(score)
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    // 改分未给等级时重新推导
    if let Some(score) = body.score {
        body.grade = Some(resolve_grade(score, body.grade.as_deref()));
    } else if let Some(grade) = body.grade.take() {
        body.grade = Some(grade.trim().to_uppercase()).filter(|g| !g.is_empty());
    }
    body.subject_name = body
        .subject_name
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match service.get_storage(request).update_mark(id, body).await {
        Ok(Some(mark)) => Ok(HttpResponse::Ok().json(ApiResponse::success(mark, "Mark updated successfully"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::MarkNotFound,
            "Mark not found",
        ))),
        Err(e) => Ok(internal_error(ErrorCode::InternalServerError, "Failed to update mark", e)),
    }
}
