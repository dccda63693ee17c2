use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TwoFactorService;
use crate::config::AppConfig;
use crate::middlewares::RequireJWT;
use crate::models::two_factor::TwoFactorSetupResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, current_user, internal_error};
use crate::utils::totp;

/// 生成新密钥，确认动态码之前不启用
pub async fn handle_setup(
    service: &TwoFactorService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if user.two_factor_enabled {
        return Ok(bad_request(
            ErrorCode::TwoFactorAlreadyEnabled,
            "Two-factor authentication is already enabled",
        ));
    }

    let storage = service.get_storage(request);
    let secret = totp::generate_secret();

    if let Err(e) = storage.set_two_factor(user.id, false, Some(secret.clone())).await {
        return Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to start two-factor setup",
            e,
        ));
    }
    RequireJWT::invalidate_user(request, user.id).await;
    info!("Two-factor setup started for user {}", user.id);

    let otpauth_url = totp::otpauth_url(&secret, &AppConfig::get().security.totp_issuer, &user.email);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TwoFactorSetupResponse {
            secret,
            otpauth_url,
        },
        "Scan the QR code with your authenticator app, then verify a code",
    )))
}
