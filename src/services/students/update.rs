use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::middlewares::RequireJWT;
use crate::models::students::requests::UpdateStudentRequest;
use crate::models::users::{requests::UserUpdate, responses::UserResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    bad_request, check_email_available, check_usn_available, internal_error, load_student,
};
use crate::utils::validate::{
    validate_cgpa, validate_email, validate_name, validate_percentage, validate_semester,
    validate_usn,
};

/// 校验并转换为存储层更新参数
fn to_user_update(body: UpdateStudentRequest) -> Result<UserUpdate, (ErrorCode, &'static str)> {
    if let Some(name) = &body.name {
        validate_name(name).map_err(|m| (ErrorCode::ValidationFailed, m))?;
    }
    if let Some(email) = &body.email {
        validate_email(email).map_err(|m| (ErrorCode::UserEmailInvalid, m))?;
    }
    if let Some(usn) = &body.usn {
        validate_usn(usn).map_err(|m| (ErrorCode::ValidationFailed, m))?;
    }
    if let Some(semester) = body.semester {
        validate_semester(semester).map_err(|m| (ErrorCode::ValidationFailed, m))?;
    }
    if let Some(cgpa) = body.cgpa {
        validate_cgpa(cgpa).map_err(|m| (ErrorCode::ValidationFailed, m))?;
    }
    if let Some(pct) = body.attendance_percentage {
        validate_percentage(pct).map_err(|m| (ErrorCode::ValidationFailed, m))?;
    }

    Ok(UserUpdate {
        name: body.name.map(|n| n.trim().to_string()),
        email: body.email.map(|e| e.trim().to_lowercase()),
        usn: body.usn.map(|u| u.trim().to_uppercase()),
        branch: body.branch,
        semester: body.semester,
        cgpa: body.cgpa,
        attendance_percentage: body.attendance_percentage,
        ..Default::default()
    })
}

pub async fn update_student(
    service: &StudentService,
    student_id: i64,
    body: UpdateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if body.is_empty() {
        return Ok(bad_request(ErrorCode::BadRequest, "No fields to update"));
    }
    let update = match to_user_update(body) {
        Ok(update) => update,
        Err((code, msg)) => return Ok(bad_request(code, msg)),
    };

    let storage = service.get_storage(request);
    if let Err(resp) = load_student(&storage, student_id).await {
        return Ok(resp);
    }
    if let Some(email) = &update.email
        && let Err(resp) = check_email_available(&storage, email, Some(student_id)).await
    {
        return Ok(resp);
    }
    if let Some(usn) = &update.usn
        && let Err(resp) = check_usn_available(&storage, usn, Some(student_id)).await
    {
        return Ok(resp);
    }

    match storage.update_user(student_id, update).await {
        Ok(Some(user)) => {
            RequireJWT::invalidate_user(request, student_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "Student updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::UserUpdateFailed,
            "Student update failed",
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_normalizes_identifiers() {
        let update = to_user_update(UpdateStudentRequest {
            email: Some(" Ravi@College.edu ".into()),
            usn: Some("1rv21cs010".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(update.email.as_deref(), Some("ravi@college.edu"));
        assert_eq!(update.usn.as_deref(), Some("1RV21CS010"));
        assert!(update.name.is_none());
    }

    #[test]
    fn test_update_rejects_out_of_range_values() {
        let err = to_user_update(UpdateStudentRequest {
            attendance_percentage: Some(120.0),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.0, ErrorCode::ValidationFailed);
    }
}
