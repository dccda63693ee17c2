use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::InternalMarksService;
use super::scoring::{calculate_cie, retain_relevant, validate_components};
use crate::models::internal_marks::requests::{InternalMarksRequest, InternalMarksUpsert};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, current_user, internal_error, load_student};

pub async fn upsert_internal_marks(
    service: &InternalMarksService,
    body: InternalMarksRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let teacher = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let course = match storage.get_course_by_id(body.course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            return Ok(internal_error(ErrorCode::InternalServerError, "Failed to load course", e));
        }
    };
    if let Err(resp) = load_student(&storage, body.student_id).await {
        return Ok(resp);
    }

    if let Err((_, msg)) = validate_components(course.subject_type, &body.components) {
        return Ok(bad_request(ErrorCode::InternalMarksOutOfRange, msg));
    }

    let components = retain_relevant(course.subject_type, &body.components);
    let calculated_cie = calculate_cie(course.subject_type, &components);

    let record = InternalMarksUpsert {
        student_id: body.student_id,
        course_id: course.id,
        subject_type: course.subject_type,
        components,
        calculated_cie,
        uploaded_by: teacher.id,
    };

    match storage.upsert_internal_marks(record).await {
        Ok((marks, created)) => {
            info!(
                "CIE {} for student {} in course {}: {}",
                if created { "created" } else { "updated" },
                marks.student_id,
                marks.course_id,
                marks.calculated_cie
            );
            let mut builder = if created {
                HttpResponse::Created()
            } else {
                HttpResponse::Ok()
            };
            Ok(builder.json(ApiResponse::success(marks, "Internal marks saved successfully")))
        }
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to save internal marks",
            e,
        )),
    }
}
