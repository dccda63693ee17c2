use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ProfileService, load_self};
use crate::middlewares::RequireJWT;
use crate::models::profile::SecurityOverviewResponse;
use crate::models::users::entities::TrustedDevice;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, internal_error};

pub async fn security_overview(
    service: &ProfileService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let full_user = match load_self(&storage, user.id).await {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let backup_codes_remaining = if full_user.two_factor_enabled {
        match storage.count_unused_backup_codes(user.id).await {
            Ok(count) => count,
            Err(e) => {
                return Ok(internal_error(
                    ErrorCode::InternalServerError,
                    "Failed to count backup codes",
                    e,
                ));
            }
        }
    } else {
        0
    };

    let security = full_user.security;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SecurityOverviewResponse {
            two_factor_enabled: full_user.two_factor_enabled,
            backup_codes_remaining,
            login_attempts: security.login_attempts,
            lock_until: security.lock_until,
            last_login_ip: security.last_login_ip,
            last_login_at: security.last_login_at,
            trusted_devices: security.trusted_devices,
        },
        "Security settings retrieved successfully",
    )))
}

/// 移除指定设备，设备不存在时返回 None
fn without_device(devices: &[TrustedDevice], device_id: &str) -> Option<Vec<TrustedDevice>> {
    let remaining: Vec<_> = devices
        .iter()
        .filter(|d| d.device_id != device_id)
        .cloned()
        .collect();
    (remaining.len() != devices.len()).then_some(remaining)
}

pub async fn remove_trusted_device(
    service: &ProfileService,
    device_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let full_user = match load_self(&storage, user.id).await {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let Some(remaining) = without_device(&full_user.security.trusted_devices, &device_id) else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Trusted device not found",
        )));
    };

    if let Err(e) = storage.set_trusted_devices(user.id, &remaining).await {
        return Ok(internal_error(
            ErrorCode::UserUpdateFailed,
            "Failed to remove trusted device",
            e,
        ));
    }
    RequireJWT::invalidate_user(request, user.id).await;
    info!("User {} removed trusted device {}", user.id, device_id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        remaining,
        "Trusted device removed successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn device(id: &str) -> TrustedDevice {
        TrustedDevice {
            device_id: id.to_string(),
            added_at: Utc::now(),
            last_used_at: None,
            ip: None,
        }
    }

    #[test]
    fn test_without_device() {
        let devices = vec![device("laptop"), device("phone")];
        let remaining = without_device(&devices, "laptop").unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].device_id, "phone");
        assert!(without_device(&devices, "tablet").is_none());
    }
}
