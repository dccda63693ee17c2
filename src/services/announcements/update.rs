use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AnnouncementService, load_own_announcement, validate_announcement};
use crate::models::announcements::UpdateAnnouncementRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, current_user, internal_error};

pub async fn update_announcement(
    service: &AnnouncementService,
    id: i64,
    mut body: UpdateAnnouncementRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if body.title.is_none() && body.content.is_none() && body.date.is_none() {
        return Ok(bad_request(ErrorCode::BadRequest, "No fields to update"));
    }
    if let Err(msg) = validate_announcement(body.title.as_deref(), body.content.as_deref()) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    body.title = body.title.map(|t| t.trim().to_string());

    let storage = service.get_storage(request);
    if let Err(resp) = load_own_announcement(&storage, &user, id).await {
        return Ok(resp);
    }

    match storage.update_announcement(id, body).await {
        Ok(Some(announcement)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            announcement,
            "Announcement updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AnnouncementNotFound,
            "Announcement not found",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to update announcement",
            e,
        )),
    }
}
