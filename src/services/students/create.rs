use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::models::students::requests::CreateStudentRequest;
use crate::models::users::{
    entities::{StudentProfile, UserKind},
    requests::NewUser,
    responses::UserResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    bad_request, check_email_available, check_usn_available, internal_error,
};
use crate::utils::password::hash_password_blocking;
use crate::utils::validate::{
    validate_cgpa, validate_email, validate_name, validate_password, validate_percentage,
    validate_semester, validate_usn,
};

fn validate_create(body: &CreateStudentRequest) -> Result<(), (ErrorCode, &'static str)> {
    validate_name(&body.name).map_err(|m| (ErrorCode::ValidationFailed, m))?;
    validate_email(&body.email).map_err(|m| (ErrorCode::UserEmailInvalid, m))?;
    validate_usn(&body.usn).map_err(|m| (ErrorCode::ValidationFailed, m))?;
    validate_semester(body.semester).map_err(|m| (ErrorCode::ValidationFailed, m))?;
    if let Some(cgpa) = body.cgpa {
        validate_cgpa(cgpa).map_err(|m| (ErrorCode::ValidationFailed, m))?;
    }
    if let Some(pct) = body.attendance_percentage {
        validate_percentage(pct).map_err(|m| (ErrorCode::ValidationFailed, m))?;
    }
    if let Some(password) = &body.password {
        validate_password(password).map_err(|m| (ErrorCode::UserPasswordInvalid, m))?;
    }
    Ok(())
}

pub async fn create_student(
    service: &StudentService,
    body: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err((code, msg)) = validate_create(&body) {
        return Ok(bad_request(code, msg));
    }

    let storage = service.get_storage(request);
    let email = body.email.trim().to_lowercase();
    let usn = body.usn.trim().to_uppercase();

    if let Err(resp) = check_email_available(&storage, &email, None).await {
        return Ok(resp);
    }
    if let Err(resp) = check_usn_available(&storage, &usn, None).await {
        return Ok(resp);
    }

    // 未提供密码时以 USN 作为初始密码
    let password = body.password.unwrap_or_else(|| usn.clone());
    let password_hash = match hash_password_blocking(password).await {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Password hashing failed",
                e,
            ));
        }
    };

    let new_user = NewUser {
        name: body.name.trim().to_string(),
        email,
        password_hash,
        kind: UserKind::Student(StudentProfile {
            usn,
            branch: body.branch,
            semester: body.semester,
            cgpa: body.cgpa.unwrap_or(0.0),
            attendance_percentage: body.attendance_percentage.unwrap_or(0.0),
            parent_id: None,
        }),
    };

    match storage.create_user(new_user).await {
        Ok(user) => {
            info!("Student {} created", user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                UserResponse { user },
                "Student created successfully",
            )))
        }
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Student creation failed",
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::Department;

    fn body() -> CreateStudentRequest {
        CreateStudentRequest {
            name: "Ravi".into(),
            email: "ravi@college.edu".into(),
            password: None,
            usn: "1RV21CS010".into(),
            branch: Department::Cse,
            semester: 3,
            cgpa: Some(7.9),
            attendance_percentage: None,
        }
    }

    #[test]
    fn test_validate_create() {
        assert!(validate_create(&body()).is_ok());

        let mut bad = body();
        bad.cgpa = Some(11.0);
        assert_eq!(validate_create(&bad).unwrap_err().0, ErrorCode::ValidationFailed);

        let mut bad = body();
        bad.password = Some("123".into());
        assert_eq!(validate_create(&bad).unwrap_err().0, ErrorCode::UserPasswordInvalid);

        let mut bad = body();
        bad.email = "not-an-email".into();
        assert_eq!(validate_create(&bad).unwrap_err().0, ErrorCode::UserEmailInvalid);
    }
}
