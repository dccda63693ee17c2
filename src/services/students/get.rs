use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::StudentService;
use crate::models::marks::entities::Attendance;
use crate::models::students::responses::{StudentAttendanceResponse, StudentMarksResponse};
use crate::models::users::{entities::User, responses::UserResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    average_score, check_student_access, current_user, internal_error, load_student,
};
use crate::storage::Storage;

pub async fn get_student(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let viewer = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = check_student_access(&storage, &viewer, student_id).await {
        return Ok(resp);
    }

    match load_student(&storage, student_id).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user },
            "Student retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}

pub async fn get_student_marks(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let viewer = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(marks_response(&service.get_storage(request), &viewer, student_id).await)
}

pub async fn get_student_attendance(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let viewer = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(attendance_response(&service.get_storage(request), &viewer, student_id).await)
}

/// 学生成绩（含归属校验），学生自助与家长查看共用
pub(crate) async fn marks_response(
    storage: &Arc<dyn Storage>,
    viewer: &User,
    student_id: i64,
) -> HttpResponse {
    if let Err(resp) = check_student_access(storage, viewer, student_id).await {
        return resp;
    }
    if let Err(resp) = load_student(storage, student_id).await {
        return resp;
    }

    match storage.list_marks_by_student(student_id).await {
        Ok(marks) => {
            let average_score = average_score(marks.iter().map(|m| &m.mark.score));
            HttpResponse::Ok().json(ApiResponse::success(
                StudentMarksResponse {
                    student_id,
                    marks,
                    average_score,
                },
                "Marks retrieved successfully",
            ))
        }
        Err(e) => internal_error(ErrorCode::InternalServerError, "Failed to retrieve marks", e),
    }
}

/// 学生考勤（含归属校验）
pub(crate) async fn attendance_response(
    storage: &Arc<dyn Storage>,
    viewer: &User,
    student_id: i64,
) -> HttpResponse {
    if let Err(resp) = check_student_access(storage, viewer, student_id).await {
        return resp;
    }
    if let Err(resp) = load_student(storage, student_id).await {
        return resp;
    }

    match storage.list_attendance_by_student(student_id).await {
        Ok(records) => HttpResponse::Ok().json(ApiResponse::success(
            StudentAttendanceResponse {
                student_id,
                overall_percentage: Attendance::overall_percentage(&records),
                records,
            },
            "Attendance retrieved successfully",
        )),
        Err(e) => internal_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve attendance",
            e,
        ),
    }
}
