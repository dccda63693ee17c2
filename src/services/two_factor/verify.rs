use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{TwoFactorService, issue_backup_codes, load_full_user};
use crate::middlewares::RequireJWT;
use crate::models::two_factor::{BackupCodesResponse, TwoFactorTokenRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, current_user, internal_error};
use crate::utils::totp;

/// 确认动态码后启用，并下发备用码
pub async fn handle_verify(
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

    if user.two_factor_enabled {
        return Ok(bad_request(
            ErrorCode::TwoFactorAlreadyEnabled,
            "Two-factor authentication is already enabled",
        ));
    }
    let Some(secret) = user.two_factor_secret.clone() else {
        return Ok(bad_request(
            ErrorCode::TwoFactorNotEnabled,
            "Two-factor setup has not been started",
        ));
    };

    if !totp::verify(&secret, &body.token) {
        return Ok(bad_request(ErrorCode::TwoFactorInvalid, "Invalid verification code"));
    }

    if let Err(e) = storage.set_two_factor(user.id, true, Some(secret)).await {
        return Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to enable two-factor authentication",
            e,
        ));
    }
    if let Err(e) = storage.touch_two_factor(user.id).await {
        warn!("Failed to record two-factor verification time for user {}: {}", user.id, e);
    }

    let backup_codes = match issue_backup_codes(&storage, user.id).await {
        Ok(codes) => codes,
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to generate backup codes",
                e,
            ));
        }
    };

    RequireJWT::invalidate_user(request, user.id).await;
    info!("Two-factor authentication enabled for user {}", user.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        BackupCodesResponse { backup_codes },
        "Two-factor authentication enabled",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::users::entities::{Department, StudentProfile, UserKind};
    use crate::models::users::requests::NewUser;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use actix_web::{HttpMessage, test as atest, web};
    use std::sync::Arc;
    use totp_rs::{Algorithm, Secret, TOTP};

    fn current_code(secret: &str) -> String {
        let bytes = Secret::Encoded(secret.to_string()).to_bytes().unwrap();
        TOTP::new(Algorithm::SHA1, 6, 2, 30, bytes)
            .unwrap()
            .generate_current()
            .unwrap()
    }

    #[actix_web::test]
    async fn test_verify_enables_and_records_use() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
        let user = storage
            .create_user(NewUser {
                name: "Asha".into(),
                email: "asha@college.edu".into(),
                password_hash: "x".into(),
                kind: UserKind::Student(StudentProfile {
                    usn: "1RV21CS001".into(),
                    branch: Department::Cse,
                    semester: 5,
                    cgpa: 8.0,
                    attendance_percentage: 0.0,
                    parent_id: None,
                }),
            })
            .await
            .unwrap();
        let secret = totp::generate_secret();
        storage
            .set_two_factor(user.id, false, Some(secret.clone()))
            .await
            .unwrap();

        let req = atest::TestRequest::default()
            .app_data(web::Data::new(storage.clone()))
            .to_http_request();
        req.extensions_mut().insert(user.clone());

        let body = TwoFactorTokenRequest {
            token: current_code(&secret),
        };
        let resp = handle_verify(&TwoFactorService::new_lazy(), body, &req)
            .await
            .unwrap();
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        let reloaded = storage.get_user_by_id(user.id).await.unwrap().unwrap();
        assert!(reloaded.two_factor_enabled);
        assert!(storage.get_two_factor_last_used(user.id).await.unwrap().is_some());
        assert_eq!(
            storage.count_unused_backup_codes(user.id).await.unwrap(),
            AppConfig::get().security.backup_code_count as u64
        );
    }
}
