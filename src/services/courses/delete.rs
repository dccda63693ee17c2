use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CourseService, check_can_manage, load_course};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, internal_error};
use crate::utils::upload::remove_stored_file;

pub async fn delete_course(
    service: &CourseService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let course = match load_course(&storage, id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = check_can_manage(&user, &course) {
        return Ok(resp);
    }

    // 记录随课程级联删除，磁盘文件需单独清理
    let materials = match storage.list_course_materials(id).await {
        Ok(materials) => materials,
        Err(e) => {
            return Ok(internal_error(ErrorCode::InternalServerError, "Failed to load materials", e));
        }
    };

    match storage.delete_course(id).await {
        Ok(true) => {
            for material in &materials {
                remove_stored_file(&material.filename);
            }
            info!(
                "Course {} deleted by {} ({} materials removed)",
                course.code,
                user.id,
                materials.len()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Course deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(internal_error(ErrorCode::InternalServerError, "Failed to delete course", e)),
    }
}
