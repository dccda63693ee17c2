use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{
        requests::LoginRequest,
        responses::{LoginResponse, TwoFactorChallengeResponse},
    },
    users::entities::{TrustedDevice, User},
};
use crate::services::access::internal_error;
use crate::services::two_factor::verify_second_factor;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password_blocking;

use super::AuthService;

/// 一次密码错误之后的计数与锁定状态
#[derive(Debug, PartialEq)]
struct FailureOutcome {
    attempts: i32,
    lock_until: Option<DateTime<Utc>>,
}

fn register_failure(
    previous_attempts: i32,
    max_attempts: i32,
    lockout_minutes: i64,
    now: DateTime<Utc>,
) -> FailureOutcome {
    let attempts = previous_attempts.saturating_add(1);
    let lock_until = (attempts >= max_attempts).then(|| now + Duration::minutes(lockout_minutes));
    FailureOutcome {
        attempts,
        lock_until,
    }
}

/// 记住设备：已存在则刷新使用时间
fn remember_device(
    devices: &[TrustedDevice],
    device_id: &str,
    ip: Option<String>,
    now: DateTime<Utc>,
) -> Vec<TrustedDevice> {
    let mut devices = devices.to_vec();
    match devices.iter_mut().find(|d| d.device_id == device_id) {
        Some(device) => {
            device.last_used_at = Some(now);
            device.ip = ip;
        }
        None => devices.push(TrustedDevice {
            device_id: device_id.to_string(),
            added_at: now,
            last_used_at: Some(now),
            ip,
        }),
    }
    devices
}

fn auth_failed() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Email or password is incorrect",
    ))
}

fn account_locked(lock_until: Option<DateTime<Utc>>) -> HttpResponse {
    let message = match lock_until {
        Some(until) => format!(
            "Account is locked due to too many failed attempts, try again after {}",
            until.to_rfc3339()
        ),
        None => "Account is locked due to too many failed attempts".to_string(),
    };
    HttpResponse::build(StatusCode::LOCKED).json(ApiResponse::error_empty(ErrorCode::AccountLocked, message))
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();
    let email = login_request.email.trim().to_lowercase();

    // 1. 查找用户
    let user: User = match storage.get_user_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(auth_failed()),
        Err(e) => return Ok(internal_error(ErrorCode::InternalServerError, "Login failed", e)),
    };

    // 2. 锁定检查，过期的锁先清零计数
    let now = Utc::now();
    if user.security.is_locked(now) {
        info!("Login attempt on locked account {}", user.id);
        return Ok(account_locked(user.security.lock_until));
    }

    let mut previous_attempts = user.security.login_attempts;
    if user.security.lock_expired(now) {
        if let Err(e) = storage.reset_login_attempts(user.id).await {
            return Ok(internal_error(ErrorCode::InternalServerError, "Login failed", e));
        }
        previous_attempts = 0;
    }

    // 3. 校验密码
    if !verify_password_blocking(login_request.password, user.password_hash.clone()).await {
        let outcome = register_failure(
            previous_attempts,
            config.security.max_login_attempts,
            config.security.lockout_minutes,
            now,
        );
        if let Err(e) = storage
            .record_login_failure(user.id, outcome.attempts, outcome.lock_until)
            .await
        {
            return Ok(internal_error(ErrorCode::InternalServerError, "Login failed", e));
        }

        if outcome.lock_until.is_some() {
            warn!(
                "Account {} locked after {} failed attempts",
                user.id, outcome.attempts
            );
            return Ok(account_locked(outcome.lock_until));
        }
        return Ok(auth_failed());
    }

    let ip = request
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());
    let device_id = login_request
        .device_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let device_trusted = device_id
        .map(|id| user.security.is_trusted_device(id))
        .unwrap_or(false);

    // 4. 两步验证（受信任设备跳过）
    if user.two_factor_enabled && !device_trusted {
        let token = login_request.two_factor_token.as_deref();
        let backup_code = login_request.backup_code.as_deref();

        if token.is_none() && backup_code.is_none() {
            return Ok(HttpResponse::Ok().json(ApiResponse::success(
                TwoFactorChallengeResponse {
                    requires_two_factor: true,
                },
                "Two-factor authentication required",
            )));
        }

        match verify_second_factor(&storage, &user, token, backup_code).await {
            Ok(true) => {}
            Ok(false) => {
                info!("Invalid two-factor code for user {}", user.id);
                return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                    ErrorCode::TwoFactorInvalid,
                    "Invalid two-factor code",
                )));
            }
            Err(e) => {
                return Ok(internal_error(ErrorCode::InternalServerError, "Login failed", e));
            }
        }
    }

    // 5. 登录成功：清零计数、记录 IP、记住设备
    if let Err(e) = storage.record_login_success(user.id, ip.clone()).await {
        return Ok(internal_error(ErrorCode::InternalServerError, "Login failed", e));
    }

    if let Some(device_id) = device_id
        && (login_request.trust_device || device_trusted)
    {
        let devices = remember_device(&user.security.trusted_devices, device_id, ip, now);
        if let Err(e) = storage.set_trusted_devices(user.id, &devices).await {
            warn!("Failed to save trusted device for user {}: {}", user.id, e);
        }
    }

    let remember_ttl = login_request
        .remember_me
        .then(|| Duration::days(config.jwt.refresh_token_remember_me_expiry));

    let token_pair = match user.generate_token_pair(remember_ttl) {
        Ok(pair) => pair,
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Login failed, unable to generate token",
                e,
            ));
        }
    };

    info!("User {} logged in successfully", user.id);

    let refresh_cookie = JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, remember_ttl);

    Ok(HttpResponse::Ok().cookie(refresh_cookie).json(ApiResponse::success(
        LoginResponse {
            access_token: token_pair.access_token,
            expires_in: JwtUtils::access_token_ttl_secs(),
            user,
        },
        "Login successful",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_triggers_on_fifth_failure() {
        let now = Utc::now();
        let mut attempts = 0;
        for _ in 0..4 {
            let outcome = register_failure(attempts, 5, 30, now);
            assert_eq!(outcome.lock_until, None);
            attempts = outcome.attempts;
        }
        let outcome = register_failure(attempts, 5, 30, now);
        assert_eq!(outcome.attempts, 5);
        assert_eq!(outcome.lock_until, Some(now + Duration::minutes(30)));
    }

    #[test]
    fn test_remember_device_updates_existing_entry() {
        let now = Utc::now();
        let devices = remember_device(&[], "laptop", Some("10.0.0.1".into()), now);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].added_at, now);

        let later = now + Duration::hours(1);
        let devices = remember_device(&devices, "laptop", None, later);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].added_at, now);
        assert_eq!(devices[0].last_used_at, Some(later));

        let devices = remember_device(&devices, "phone", None, later);
        assert_eq!(devices.len(), 2);
    }

    mod with_storage {
        use super::*;
        use crate::models::users::entities::{Department, StudentProfile, UserKind};
        use crate::models::users::requests::NewUser;
        use crate::storage::Storage;
        use crate::storage::sea_orm_storage::SeaOrmStorage;
        use crate::utils::password::hash_password;
        use actix_web::{App, test as atest, web};
        use std::sync::Arc;

        async fn login_route(
            req: HttpRequest,
            body: web::Json<LoginRequest>,
        ) -> ActixResult<HttpResponse> {
            handle_login(&AuthService::new_lazy(), body.into_inner(), &req).await
        }

        async fn storage_with_student(password: &str) -> Arc<dyn Storage> {
            let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
            storage
                .create_user(NewUser {
                    name: "Asha".into(),
                    email: "asha@college.edu".into(),
                    password_hash: hash_password(password).unwrap(),
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
            storage
        }

        fn login_body(password: &str) -> serde_json::Value {
            serde_json::json!({ "email": "Asha@College.edu", "password": password })
        }

        #[actix_web::test]
        async fn test_correct_password_is_refused_once_locked() {
            let storage = storage_with_student("s3cure-pass").await;
            let app = atest::init_service(
                App::new()
                    .app_data(web::Data::new(storage.clone()))
                    .route("/login", web::post().to(login_route)),
            )
            .await;

            let mut statuses = Vec::new();
            for password in ["bad-1", "bad-2", "bad-3", "bad-4", "bad-5", "s3cure-pass"] {
                let req = atest::TestRequest::post()
                    .uri("/login")
                    .set_json(login_body(password))
                    .to_request();
                statuses.push(atest::call_service(&app, req).await.status().as_u16());
            }
            assert_eq!(statuses, vec![401, 401, 401, 401, 423, 423]);

            let user = storage
                .get_user_by_email("asha@college.edu")
                .await
                .unwrap()
                .unwrap();
            assert!(user.security.is_locked(Utc::now()));
        }

        #[actix_web::test]
        async fn test_successful_login_resets_failure_count() {
            let storage = storage_with_student("s3cure-pass").await;
            let app = atest::init_service(
                App::new()
                    .app_data(web::Data::new(storage.clone()))
                    .route("/login", web::post().to(login_route)),
            )
            .await;

            for password in ["bad-1", "bad-2"] {
                let req = atest::TestRequest::post()
                    .uri("/login")
                    .set_json(login_body(password))
                    .to_request();
                assert_eq!(atest::call_service(&app, req).await.status().as_u16(), 401);
            }

            let req = atest::TestRequest::post()
                .uri("/login")
                .set_json(login_body("s3cure-pass"))
                .to_request();
            let resp = atest::call_service(&app, req).await;
            assert_eq!(resp.status().as_u16(), 200);

            let user = storage
                .get_user_by_email("asha@college.edu")
                .await
                .unwrap()
                .unwrap();
            assert_eq!(user.security.login_attempts, 0);
        }
    }
}
