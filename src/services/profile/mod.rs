pub mod basic;
pub mod password;
pub mod picture;
pub mod preferences;
pub mod security;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::profile::{ChangePasswordRequest, UpdatePreferencesRequest};
use crate::models::users::entities::User;
use crate::models::users::requests::{UpdateBasicInfoRequest, UserUpdate};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::internal_error;
use crate::storage::Storage;

pub struct ProfileService {
    storage: Option<Arc<dyn Storage>>,
}

impl ProfileService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn get_profile(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        basic::get_profile(self, request).await
    }

    pub async fn update_basic_info(
        &self,
        body: UpdateBasicInfoRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        basic::update_basic_info(self, body, request).await
    }

    pub async fn change_password(
        &self,
        body: ChangePasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::change_password(self, body, request).await
    }

    pub async fn upload_picture(
        &self,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        picture::upload_picture(self, payload, request).await
    }

    pub async fn delete_picture(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        picture::delete_picture(self, request).await
    }

    pub async fn update_preferences(
        &self,
        body: UpdatePreferencesRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        preferences::update_preferences(self, body, request).await
    }

    pub async fn security_overview(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        security::security_overview(self, request).await
    }

    pub async fn remove_trusted_device(
        &self,
        device_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        security::remove_trusted_device(self, device_id, request).await
    }
}

/// 从数据库读取当前用户（含缓存中不保留的安全字段）
pub(crate) async fn load_self(
    storage: &Arc<dyn Storage>,
    user_id: i64,
) -> Result<User, HttpResponse> {
    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Err(internal_error(ErrorCode::InternalServerError, "Failed to load profile", e)),
    }
}

/// 写入更新并清除缓存，返回更新后的用户
pub(crate) async fn apply_update(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
    user_id: i64,
    update: UserUpdate,
) -> Result<User, HttpResponse> {
    match storage.update_user(user_id, update).await {
        Ok(Some(user)) => {
            RequireJWT::invalidate_user(request, user_id).await;
            Ok(user)
        }
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Err(internal_error(ErrorCode::UserUpdateFailed, "Failed to update profile", e)),
    }
}
