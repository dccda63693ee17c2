use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::MarkService;
use crate::middlewares::RequireJWT;
use crate::models::marks::requests::{AttendanceRequest, AttendanceUpsert};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, current_user, internal_error, load_student};
use crate::services::courses::load_course;
use crate::services::students::get::attendance_response;
use crate::utils::validate::validate_attendance_counts;

pub async fn upsert_attendance(
    service: &MarkService,
    body: AttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_attendance_counts(body.total_classes, body.attended_classes) {
        return Ok(bad_request(ErrorCode::AttendanceInvalid, msg));
    }

    let storage = service.get_storage(request);
    let course = match load_course(&storage, body.course_id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = load_student(&storage, body.student_id).await {
        return Ok(resp);
    }

    let record = AttendanceUpsert {
        student_id: body.student_id,
        course_id: course.id,
        subject_name: body
            .subject_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| course.title.clone()),
        total_classes: body.total_classes,
        attended_classes: body.attended_classes,
    };

    let (attendance, created) = match storage.upsert_attendance(record).await {
        Ok(result) => result,
        Err(e) => {
            return Ok(internal_error(ErrorCode::InternalServerError, "Failed to save attendance", e));
        }
    };

    // 汇总出勤率写回学生档案
    match storage.recompute_student_attendance(body.student_id).await {
        Ok(pct) => info!("Student {} attendance now {}%", body.student_id, pct),
        Err(e) => warn!("Failed to recompute attendance for {}: {}", body.student_id, e),
    }
    RequireJWT::invalidate_user(request, body.student_id).await;

    let mut builder = if created {
        HttpResponse::Created()
    } else {
        HttpResponse::Ok()
    };
    Ok(builder.json(ApiResponse::success(attendance, "Attendance saved successfully")))
}

pub async fn attendance_by_student(
    service: &MarkService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let viewer = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(attendance_response(&service.get_storage(request), &viewer, student_id).await)
}
