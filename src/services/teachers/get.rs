use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::TeacherService;
use crate::models::users::{entities::User, responses::UserResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::internal_error;
use crate::storage::Storage;

/// 按 ID 加载教师，非教师账号视为不存在
pub(crate) async fn load_teacher(storage: &Arc<dyn Storage>, id: i64) -> Result<User, HttpResponse> {
    match storage.get_user_by_id(id).await {
        Ok(Some(user)) if user.as_teacher().is_some() => Ok(user),
        Ok(_) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TeacherNotFound,
            "Teacher not found",
        ))),
        Err(e) => Err(internal_error(ErrorCode::InternalServerError, "Failed to load teacher", e)),
    }
}

pub async fn get_teacher(
    service: &TeacherService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match load_teacher(&service.get_storage(request), id).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user },
            "Teacher retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}
