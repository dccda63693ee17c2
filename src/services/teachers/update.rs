use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use super::get::load_teacher;
use crate::middlewares::RequireJWT;
use crate::models::teachers::UpdateTeacherRequest;
use crate::models::users::{entities::User, requests::UserUpdate, responses::UserResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    bad_request, check_email_available, check_faculty_id_available, current_user, internal_error,
};
use crate::utils::validate::{validate_email, validate_faculty_id, validate_name};

/// 本人或管理员可修改；管理员标记只有管理员能改
fn check_update_permission(
    editor: &User,
    teacher_id: i64,
    body: &UpdateTeacherRequest,
) -> Result<(), &'static str> {
    if editor.id != teacher_id && !editor.is_admin() {
        return Err("You can only update your own profile");
    }
    if body.is_admin.is_some() && !editor.is_admin() {
        return Err("Only administrators can change admin status");
    }
    Ok(())
}

fn to_user_update(body: UpdateTeacherRequest) -> Result<UserUpdate, (ErrorCode, &'static str)> {
    if let Some(name) = &body.name {
        validate_name(name).map_err(|m| (ErrorCode::ValidationFailed, m))?;
    }
    if let Some(email) = &body.email {
        validate_email(email).map_err(|m| (ErrorCode::UserEmailInvalid, m))?;
    }
    if let Some(faculty_id) = &body.faculty_id {
        validate_faculty_id(faculty_id).map_err(|m| (ErrorCode::ValidationFailed, m))?;
    }

    Ok(UserUpdate {
        name: body.name.map(|n| n.trim().to_string()),
        email: body.email.map(|e| e.trim().to_lowercase()),
        faculty_id: body.faculty_id.map(|f| f.trim().to_uppercase()),
        department: body.department,
        designation: body.designation,
        is_admin: body.is_admin,
        ..Default::default()
    })
}

pub async fn update_teacher(
    service: &TeacherService,
    teacher_id: i64,
    body: UpdateTeacherRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let editor = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if let Err(msg) = check_update_permission(&editor, teacher_id, &body) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, msg)));
    }

    let update = match to_user_update(body) {
        Ok(update) => update,
        Err((code, msg)) => return Ok(bad_request(code, msg)),
    };
    if update.is_empty() {
        return Ok(bad_request(ErrorCode::BadRequest, "No fields to update"));
    }

    let storage = service.get_storage(request);
    if let Err(resp) = load_teacher(&storage, teacher_id).await {
        return Ok(resp);
    }
    if let Some(email) = &update.email
        && let Err(resp) = check_email_available(&storage, email, Some(teacher_id)).await
    {
        return Ok(resp);
    }
    if let Some(faculty_id) = &update.faculty_id
        && let Err(resp) = check_faculty_id_available(&storage, faculty_id, Some(teacher_id)).await
    {
        return Ok(resp);
    }

    match storage.update_user(teacher_id, update).await {
        Ok(Some(user)) => {
            RequireJWT::invalidate_user(request, teacher_id).await;
            info!("Teacher {} updated by {}", teacher_id, editor.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "Teacher updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TeacherNotFound,
            "Teacher not found",
        ))),
        Err(e) => Ok(internal_error(ErrorCode::UserUpdateFailed, "Failed to update teacher", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{Department, Designation, TeacherProfile, UserKind};

    fn teacher(id: i64, is_admin: bool) -> User {
        User::fixture(
            id,
            UserKind::Teacher(TeacherProfile {
                faculty_id: format!("FAC{id:03}"),
                department: Department::Cse,
                designation: Designation::Professor,
                is_admin,
            }),
        )
    }

    #[test]
    fn test_update_permission() {
        let own = UpdateTeacherRequest {
            name: Some("New".into()),
            ..Default::default()
        };
        let promote = UpdateTeacherRequest {
            is_admin: Some(true),
            ..Default::default()
        };

        assert!(check_update_permission(&teacher(1, false), 1, &own).is_ok());
        assert!(check_update_permission(&teacher(1, false), 2, &own).is_err());
        assert!(check_update_permission(&teacher(1, false), 1, &promote).is_err());
        assert!(check_update_permission(&teacher(1, true), 2, &promote).is_ok());
    }
}
