use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnnouncementService;
use crate::models::announcements::AnnouncementListParams;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::internal_error;

pub async fn list_announcements(
    service: &AnnouncementService,
    params: AnnouncementListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let page = params.pagination.page.max(1) as u64;
    let size = params.pagination.size.clamp(1, 100) as u64;

    match service
        .get_storage(request)
        .list_announcements_with_pagination(page, size)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Announcements retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve announcements",
            e,
        )),
    }
}
