use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AnnouncementService, validate_announcement};
use crate::models::announcements::CreateAnnouncementRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, current_user, internal_error};

pub async fn create_announcement(
    service: &AnnouncementService,
    mut body: CreateAnnouncementRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let teacher = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if let Err(msg) = validate_announcement(Some(&body.title), Some(&body.content)) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    body.title = body.title.trim().to_string();

    match service
        .get_storage(request)
        .create_announcement(teacher.id, body)
        .await
    {
        Ok(announcement) => {
            info!("Announcement {} posted by {}", announcement.id, teacher.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                announcement,
                "Announcement created successfully",
            )))
        }
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to create announcement",
            e,
        )),
    }
}
