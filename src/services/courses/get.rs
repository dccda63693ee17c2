use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, load_course};
use crate::models::courses::responses::CourseDetailResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::internal_error;

/// 课程详情：授课教师、选课学生、课程资料
pub async fn get_course(
    service: &CourseService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let course = match load_course(&storage, id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };

    let teacher = match course.teacher_id {
        Some(teacher_id) => match storage.get_user_by_id(teacher_id).await {
            Ok(teacher) => teacher,
            Err(e) => {
                return Ok(internal_error(ErrorCode::InternalServerError, "Failed to load teacher", e));
            }
        },
        None => None,
    };
    let students = match storage.list_course_students(course.id).await {
        Ok(students) => students,
        Err(e) => {
            return Ok(internal_error(ErrorCode::InternalServerError, "Failed to load students", e));
        }
    };
    let materials = match storage.list_course_materials(course.id).await {
        Ok(materials) => materials,
        Err(e) => {
            return Ok(internal_error(ErrorCode::InternalServerError, "Failed to load materials", e));
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CourseDetailResponse {
            course,
            teacher,
            students,
            materials,
        },
        "Course retrieved successfully",
    )))
}
