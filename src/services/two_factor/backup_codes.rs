use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TwoFactorService, issue_backup_codes, load_full_user};
use crate::models::two_factor::{BackupCodesResponse, TwoFactorTokenRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, current_user, internal_error};
use crate::utils::totp;

/// 重新生成备用码，旧码全部作废
pub async fn handle_regenerate(
    service: &TwoFactorService,
    body: TwoFactorTokenRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user_id = match current_user(request) {
        Ok(user) => user.id,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let user = match load_full_user(&storage, user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found")));
        }
        Err(e) => {
            return Ok(internal_error(ErrorCode::InternalServerError, "Failed to load user", e));
        }
    };

    let secret = match (&user.two_factor_secret, user.two_factor_enabled) {
        (Some(secret), true) => secret.clone(),
        _ => {
            return Ok(bad_request(
                ErrorCode::TwoFactorNotEnabled,
                "Two-factor authentication is not enabled",
            ));
        }
    };

    if !totp::verify(&secret, &body.token) {
        return Ok(bad_request(ErrorCode::TwoFactorInvalid, "Invalid verification code"));
    }

    match issue_backup_codes(&storage, user.id).await {
        Ok(backup_codes) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            BackupCodesResponse { backup_codes },
            "Backup codes regenerated",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to generate backup codes",
            e,
        )),
    }
}
