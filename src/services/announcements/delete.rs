use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AnnouncementService, load_own_announcement};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, internal_error};

pub async fn delete_announcement(
    service: &AnnouncementService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    if let Err(resp) = load_own_announcement(&storage, &user, id).await {
        return Ok(resp);
    }

    match storage.delete_announcement(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
            "Announcement deleted successfully",
        ))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AnnouncementNotFound,
            "Announcement not found",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to delete announcement",
            e,
        )),
    }
}
