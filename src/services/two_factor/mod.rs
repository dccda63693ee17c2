//! 两步验证：TOTP 密钥管理与一次性备用码

pub mod backup_codes;
pub mod disable;
pub mod setup;
pub mod status;
pub mod verify;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::two_factor::{DisableTwoFactorRequest, TwoFactorTokenRequest};
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::password::{hash_password_blocking, verify_password_blocking};
use crate::utils::random_code::{generate_backup_codes, normalize_backup_code};
use crate::utils::totp;

pub struct TwoFactorService {
    storage: Option<Arc<dyn Storage>>,
}

impl TwoFactorService {
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

    pub async fn status(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        status::handle_status(self, request).await
    }

    pub async fn setup(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        setup::handle_setup(self, request).await
    }

    pub async fn verify(
        &self,
        body: TwoFactorTokenRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        verify::handle_verify(self, body, request).await
    }

    pub async fn disable(
        &self,
        body: DisableTwoFactorRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        disable::handle_disable(self, body, request).await
    }

    pub async fn regenerate_backup_codes(
        &self,
        body: TwoFactorTokenRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        backup_codes::handle_regenerate(self, body, request).await
    }
}

/// 校验第二因素：优先 TOTP 动态码，其次备用码（命中即消费）
pub(crate) async fn verify_second_factor(
    storage: &Arc<dyn Storage>,
    user: &User,
    token: Option<&str>,
    backup_code: Option<&str>,
) -> Result<bool> {
    if let (Some(token), Some(secret)) = (token, user.two_factor_secret.as_deref())
        && totp::verify(secret, token)
    {
        storage.touch_two_factor(user.id).await?;
        return Ok(true);
    }

    let Some(code) = backup_code.map(normalize_backup_code).filter(|c| !c.is_empty()) else {
        return Ok(false);
    };

    for record in storage.list_unused_backup_codes(user.id).await? {
        if verify_password_blocking(code.clone(), record.code_hash).await {
            // 条件更新，并发请求只有一个能消费成功
            let consumed = storage.consume_backup_code(record.id).await?;
            debug!("Backup code {} consumed: {}", record.id, consumed);
            if consumed {
                storage.touch_two_factor(user.id).await?;
            }
            return Ok(consumed);
        }
    }

    Ok(false)
}

/// 生成一组新的备用码，替换旧码，返回明文
pub(crate) async fn issue_backup_codes(
    storage: &Arc<dyn Storage>,
    user_id: i64,
) -> Result<Vec<String>> {
    let codes = generate_backup_codes(AppConfig::get().security.backup_code_count);
    let mut hashes = Vec::with_capacity(codes.len());
    for code in &codes {
        hashes.push(hash_password_blocking(code.clone()).await?);
    }
    storage.replace_backup_codes(user_id, hashes).await?;
    Ok(codes)
}

/// 从存储重新读取用户（缓存中的用户不含密钥与密码哈希）
pub(crate) async fn load_full_user(storage: &Arc<dyn Storage>, user_id: i64) -> Result<Option<User>> {
    storage.get_user_by_id(user_id).await
}
