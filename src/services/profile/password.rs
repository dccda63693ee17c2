use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ProfileService, apply_update, load_self};
use crate::models::profile::ChangePasswordRequest;
use crate::models::users::requests::UserUpdate;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, current_user, internal_error};
use crate::utils::password::{hash_password_blocking, verify_password_blocking};
use crate::utils::validate::validate_password;

pub async fn change_password(
    service: &ProfileService,
    body: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if let Err(msg) = validate_password(&body.new_password) {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
    }
    if body.new_password == body.current_password {
        return Ok(bad_request(
            ErrorCode::UserPasswordInvalid,
            "New password must differ from the current password",
        ));
    }

    let storage = service.get_storage(request);
    let full_user = match load_self(&storage, user.id).await {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if !verify_password_blocking(body.current_password, full_user.password_hash.clone()).await {
        return Ok(bad_request(
            ErrorCode::UserPasswordInvalid,
            "Current password is incorrect",
        ));
    }

    let password_hash = match hash_password_blocking(body.new_password).await {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::UserUpdateFailed,
                "Password hashing failed",
                e,
            ));
        }
    };

    let update = UserUpdate {
        password_hash: Some(password_hash),
        ..Default::default()
    };
    match apply_update(&storage, request, user.id, update).await {
        Ok(_) => {
            info!("User {} changed password", user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Password changed successfully",
            )))
        }
        Err(resp) => Ok(resp),
    }
}
