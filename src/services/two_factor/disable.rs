use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TwoFactorService, load_full_user, verify_second_factor};
use crate::middlewares::RequireJWT;
use crate::models::two_factor::DisableTwoFactorRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, current_user, internal_error};
use crate::utils::password::verify_password_blocking;

/// 关闭需要密码 + 动态码或备用码
pub async fn handle_disable(
    service: &TwoFactorService,
    body: DisableTwoFactorRequest,
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

    if !user.two_factor_enabled {
        return Ok(bad_request(
            ErrorCode::TwoFactorNotEnabled,
            "Two-factor authentication is not enabled",
        ));
    }

    if !verify_password_blocking(body.password, user.password_hash.clone()).await {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, "Password is incorrect"));
    }

    match verify_second_factor(
        &storage,
        &user,
        body.token.as_deref(),
        body.backup_code.as_deref(),
    )
    .await
    {
        Ok(true) => {}
        Ok(false) => {
            return Ok(bad_request(ErrorCode::TwoFactorInvalid, "Invalid two-factor code"));
        }
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to verify two-factor code",
                e,
            ));
        }
    }

    if let Err(e) = storage.set_two_factor(user.id, false, None).await {
        return Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to disable two-factor authentication",
            e,
        ));
    }
    if let Err(e) = storage.replace_backup_codes(user.id, Vec::new()).await {
        tracing::warn!("Failed to clear backup codes for user {}: {}", user.id, e);
    }

    RequireJWT::invalidate_user(request, user.id).await;
    info!("Two-factor authentication disabled for user {}", user.id);

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
        "Two-factor authentication disabled",
    )))
}
