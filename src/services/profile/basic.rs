use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ProfileService, apply_update, load_self};
use crate::models::users::requests::{UpdateBasicInfoRequest, UserUpdate};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, check_email_available, current_user};
use crate::utils::validate::{validate_email, validate_name};

pub async fn get_profile(
    service: &ProfileService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    match load_self(&service.get_storage(request), user.id).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            user,
            "Profile retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}

/// 规范化并校验基本信息，返回存储层更新参数
fn to_user_update(body: UpdateBasicInfoRequest) -> Result<UserUpdate, (ErrorCode, &'static str)> {
    let name = body.name.map(|n| n.trim().to_string());
    if let Some(name) = &name {
        validate_name(name).map_err(|msg| (ErrorCode::ValidationFailed, msg))?;
    }
    let email = body.email.map(|e| e.trim().to_lowercase());
    if let Some(email) = &email {
        validate_email(email).map_err(|msg| (ErrorCode::UserEmailInvalid, msg))?;
    }
    if name.is_none() && email.is_none() {
        return Err((ErrorCode::BadRequest, "No fields to update"));
    }
    Ok(UserUpdate {
        name,
        email,
        ..Default::default()
    })
}

pub async fn update_basic_info(
    service: &ProfileService,
    body: UpdateBasicInfoRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let update = match to_user_update(body) {
        Ok(update) => update,
        Err((code, msg)) => return Ok(bad_request(code, msg)),
    };

    let storage = service.get_storage(request);
    if let Some(email) = &update.email
        && let Err(resp) = check_email_available(&storage, email, Some(user.id)).await
    {
        return Ok(resp);
    }

    match apply_update(&storage, request, user.id, update).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            user,
            "Profile updated successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_info_is_normalized() {
        let update = to_user_update(UpdateBasicInfoRequest {
            name: Some("  Ravi Kumar ".into()),
            email: Some("Ravi@College.EDU".into()),
        })
        .unwrap();
        assert_eq!(update.name.as_deref(), Some("Ravi Kumar"));
        assert_eq!(update.email.as_deref(), Some("ravi@college.edu"));
    }

    #[test]
    fn test_empty_update_is_rejected() {
        let err = to_user_update(UpdateBasicInfoRequest::default()).unwrap_err();
        assert_eq!(err.0, ErrorCode::BadRequest);

        let err = to_user_update(UpdateBasicInfoRequest {
            name: None,
            email: Some("not-an-email".into()),
        })
        .unwrap_err();
        assert_eq!(err.0, ErrorCode::UserEmailInvalid);
    }
}
