use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TwoFactorService;
use crate::models::two_factor::TwoFactorStatusResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, internal_error};

pub async fn handle_status(
    service: &TwoFactorService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let backup_codes_remaining = match storage.count_unused_backup_codes(user.id).await {
        Ok(count) => count,
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to load two-factor status",
                e,
            ));
        }
    };
    let last_used_at = storage.get_two_factor_last_used(user.id).await.unwrap_or(None);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TwoFactorStatusResponse {
            enabled: user.two_factor_enabled,
            backup_codes_remaining,
            last_used_at,
        },
        "Two-factor status retrieved successfully",
    )))
}
