//! 跨服务共用的身份与归属校验
//!
//! 校验函数返回 `Result<_, HttpResponse>`，失败时直接把响应交给 handler 返回。

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 当前登录用户
pub fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

/// 500 响应，内部错误详情只在非生产环境返回
pub fn internal_error(code: ErrorCode, context: &str, err: impl std::fmt::Display) -> HttpResponse {
    tracing::error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ApiResponse::error_with_detail(code, context, err))
}

/// 按 ID 加载学生，非学生账号视为不存在
pub async fn load_student(
    storage: &Arc<dyn Storage>,
    student_id: i64,
) -> Result<User, HttpResponse> {
    match storage.get_user_by_id(student_id).await {
        Ok(Some(user)) if user.as_student().is_some() => Ok(user),
        Ok(_) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => Err(internal_error(ErrorCode::InternalServerError, "Failed to load student", e)),
    }
}

/// 学生只能看自己，家长只能看已关联的子女，教师不受限
pub async fn check_student_access(
    storage: &Arc<dyn Storage>,
    viewer: &User,
    student_id: i64,
) -> Result<(), HttpResponse> {
    let allowed = match viewer.role() {
        UserRole::Teacher => true,
        UserRole::Student => viewer.id == student_id,
        UserRole::Parent => storage
            .is_parent_of(viewer.id, student_id)
            .await
            .map_err(|e| {
                internal_error(ErrorCode::InternalServerError, "Failed to check parent link", e)
            })?,
    };

    if allowed {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You do not have permission to view this student",
        )))
    }
}

/// 邮箱全局唯一（`exclude` 为自身 ID 时允许保持原邮箱）
pub async fn check_email_available(
    storage: &Arc<dyn Storage>,
    email: &str,
    exclude: Option<i64>,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_email(email).await {
        Ok(Some(existing)) if Some(existing.id) != exclude => {
            Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::UserEmailAlreadyExists,
                "Email already exists",
            )))
        }
        Ok(_) => Ok(()),
        Err(e) => Err(internal_error(ErrorCode::InternalServerError, "Failed to check email", e)),
    }
}

pub async fn check_usn_available(
    storage: &Arc<dyn Storage>,
    usn: &str,
    exclude: Option<i64>,
) -> Result<(), HttpResponse> {
    match storage.get_student_by_usn(usn).await {
        Ok(Some(existing)) if Some(existing.id) != exclude => {
            Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::StudentUsnAlreadyExists,
                "USN already exists",
            )))
        }
        Ok(_) => Ok(()),
        Err(e) => Err(internal_error(ErrorCode::InternalServerError, "Failed to check USN", e)),
    }
}

pub async fn check_faculty_id_available(
    storage: &Arc<dyn Storage>,
    faculty_id: &str,
    exclude: Option<i64>,
) -> Result<(), HttpResponse> {
    match storage.get_teacher_by_faculty_id(faculty_id).await {
        Ok(Some(existing)) if Some(existing.id) != exclude => {
            Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::TeacherFacultyIdAlreadyExists,
                "Faculty ID already exists",
            )))
        }
        Ok(_) => Ok(()),
        Err(e) => Err(internal_error(ErrorCode::InternalServerError, "Failed to check faculty ID", e)),
    }
}

pub fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message.into()))
}

/// 成绩平均值，保留两位小数
pub fn average_score<'a>(scores: impl IntoIterator<Item = &'a f64>) -> f64 {
    let (sum, count) = scores
        .into_iter()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        (sum / count as f64 * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_score() {
        assert_eq!(average_score(&[]), 0.0);
        assert_eq!(average_score(&[70.0, 80.0, 85.0]), 78.33);
    }

    #[actix_web::test]
    async fn test_current_user_requires_login() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        let resp = current_user(&req).unwrap_err();
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }
}
