use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::responses::LoginResponse,
    users::{
        entities::{
            Designation, ParentProfile, StudentProfile, TeacherProfile, UserKind, UserRole,
        },
        requests::{NewUser, RegisterRequest},
    },
};
use crate::services::access::{
    bad_request, check_email_available, check_faculty_id_available, check_usn_available,
    internal_error,
};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::hash_password_blocking;
use crate::utils::validate::{
    validate_cgpa, validate_email, validate_faculty_id, validate_name, validate_password,
    validate_semester, validate_usn,
};

use super::AuthService;

/// 按角色组装用户档案，缺少必填字段时返回错误
fn build_user_kind(req: &RegisterRequest) -> Result<UserKind, &'static str> {
    match req.role {
        UserRole::Student => {
            let usn = req.usn.as_deref().ok_or("USN is required for students")?;
            validate_usn(usn)?;
            let branch = req.branch.ok_or("Branch is required for students")?;
            let semester = req.semester.ok_or("Semester is required for students")?;
            validate_semester(semester)?;
            let cgpa = req.cgpa.unwrap_or(0.0);
            validate_cgpa(cgpa)?;

            Ok(UserKind::Student(StudentProfile {
                usn: usn.trim().to_uppercase(),
                branch,
                semester,
                cgpa,
                attendance_percentage: 0.0,
                parent_id: None,
            }))
        }
        UserRole::Parent => Ok(UserKind::Parent(ParentProfile {
            child_usn: req
                .child_usn
                .as_deref()
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty()),
        })),
        UserRole::Teacher => {
            let faculty_id = req
                .faculty_id
                .as_deref()
                .ok_or("Faculty ID is required for teachers")?;
            validate_faculty_id(faculty_id)?;
            let department = req.department.ok_or("Department is required for teachers")?;

            Ok(UserKind::Teacher(TeacherProfile {
                faculty_id: faculty_id.trim().to_uppercase(),
                department,
                designation: req.designation.unwrap_or(Designation::AssistantProfessor),
                is_admin: false,
            }))
        }
    }
}

async fn check_unique_fields(
    storage: &Arc<dyn Storage>,
    email: &str,
    kind: &UserKind,
) -> Result<(), HttpResponse> {
    check_email_available(storage, email, None).await?;
    match kind {
        UserKind::Student(profile) => check_usn_available(storage, &profile.usn, None).await,
        UserKind::Teacher(profile) => {
            check_faculty_id_available(storage, &profile.faculty_id, None).await
        }
        UserKind::Parent(_) => Ok(()),
    }
}

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_name(&register_request.name) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Err(msg) = validate_email(&register_request.email) {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }
    if let Err(msg) = validate_password(&register_request.password) {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
    }

    let kind = match build_user_kind(&register_request) {
        Ok(kind) => kind,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = service.get_storage(request);
    let email = register_request.email.trim().to_lowercase();

    if let Err(resp) = check_unique_fields(&storage, &email, &kind).await {
        return Ok(resp);
    }

    let password_hash = match hash_password_blocking(register_request.password).await {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::RegisterFailed,
                "Password hashing failed",
                e,
            ));
        }
    };

    let child_usn = match &kind {
        UserKind::Parent(profile) => profile.child_usn.clone(),
        _ => None,
    };
    let user = match storage
        .create_user(NewUser {
            name: register_request.name.trim().to_string(),
            email,
            password_hash,
            kind,
        })
        .await
    {
        Ok(user) => user,
        Err(e) => return Ok(internal_error(ErrorCode::RegisterFailed, "Registration failed", e)),
    };

    // 家长注册时若子女已存在则直接关联
    if let Some(usn) = child_usn {
        match storage.get_student_by_usn(&usn).await {
            Ok(Some(student)) => {
                if let Err(e) = storage.link_child(user.id, student.id).await {
                    warn!("Failed to link parent {} to {}: {}", user.id, usn, e);
                }
            }
            Ok(None) => info!("Child USN {} not found during parent registration", usn),
            Err(e) => warn!("Failed to look up child {}: {}", usn, e),
        }
    }

    let config = service.get_config();
    let token_pair = match user.generate_token_pair(None) {
        Ok(pair) => pair,
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Registration succeeded but token generation failed",
                e,
            ));
        }
    };

    info!("User {} registered as {}", user.id, user.role());

    let refresh_cookie = JwtUtils::create_refresh_token_cookie(
        &token_pair.refresh_token,
        Some(chrono::Duration::days(config.jwt.refresh_token_expiry)),
    );

    Ok(HttpResponse::Created().cookie(refresh_cookie).json(ApiResponse::success(
        LoginResponse {
            access_token: token_pair.access_token,
            expires_in: JwtUtils::access_token_ttl_secs(),
            user,
        },
        "Registration successful",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::Department;

    fn request(role: UserRole) -> RegisterRequest {
        RegisterRequest {
            name: "Asha".into(),
            email: "asha@college.edu".into(),
            password: "s3cure-pass".into(),
            role,
            usn: None,
            branch: None,
            semester: None,
            cgpa: None,
            child_usn: None,
            faculty_id: None,
            department: None,
            designation: None,
        }
    }

    #[test]
    fn test_student_requires_profile_fields() {
        let mut req = request(UserRole::Student);
        assert!(build_user_kind(&req).is_err());

        req.usn = Some("1rv21cs001".into());
        req.branch = Some(Department::Cse);
        req.semester = Some(5);
        match build_user_kind(&req) {
            Ok(UserKind::Student(p)) => {
                assert_eq!(p.usn, "1RV21CS001");
                assert_eq!(p.cgpa, 0.0);
            }
            other => panic!("unexpected: {other:?}"),
        }

        req.semester = Some(9);
        assert!(build_user_kind(&req).is_err());
    }

    #[test]
    fn test_teacher_is_never_admin_on_register() {
        let mut req = request(UserRole::Teacher);
        req.faculty_id = Some("fac001".into());
        req.department = Some(Department::Ise);
        match build_user_kind(&req) {
            Ok(UserKind::Teacher(p)) => {
                assert!(!p.is_admin);
                assert_eq!(p.faculty_id, "FAC001");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_parent_child_usn_is_optional() {
        let mut req = request(UserRole::Parent);
        req.child_usn = Some("  ".into());
        match build_user_kind(&req) {
            Ok(UserKind::Parent(p)) => assert_eq!(p.child_usn, None),
            other => panic!("unexpected: {other:?}"),
        }

        req.child_usn = Some("1rv21cs001".into());
        match build_user_kind(&req) {
            Ok(UserKind::Parent(p)) => assert_eq!(p.child_usn.as_deref(), Some("1RV21CS001")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
