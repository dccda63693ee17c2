use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ParentService;
use crate::middlewares::RequireJWT;
use crate::models::parents::{ChildrenResponse, LinkChildRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, current_user, internal_error};
use crate::utils::validate::validate_usn;

pub async fn list_children(
    service: &ParentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let parent = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match service.get_storage(request).list_children(parent.id).await {
        Ok(children) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ChildrenResponse { children },
            "Children retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve children",
            e,
        )),
    }
}

pub async fn link_child(
    service: &ParentService,
    body: LinkChildRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let parent = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let usn = body.usn.trim().to_uppercase();
    if let Err(msg) = validate_usn(&usn) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);
    let student = match storage.get_student_by_usn(&usn).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "No student found with this USN",
            )));
        }
        Err(e) => {
            return Ok(internal_error(ErrorCode::InternalServerError, "Failed to look up student", e));
        }
    };

    match storage.link_child(parent.id, student.id).await {
        Ok(true) => {
            RequireJWT::invalidate_user(request, parent.id).await;
            RequireJWT::invalidate_user(request, student.id).await;
            info!("Parent {} linked to student {}", parent.id, student.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                student,
                "Child linked successfully",
            )))
        }
        Ok(false) => Ok(bad_request(
            ErrorCode::ChildAlreadyLinked,
            "This student is already linked to your account",
        )),
        Err(e) => Ok(internal_error(ErrorCode::InternalServerError, "Failed to link child", e)),
    }
}

pub async fn unlink_child(
    service: &ParentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let parent = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match service.get_storage(request).unlink_child(parent.id, student_id).await {
        Ok(true) => {
            RequireJWT::invalidate_user(request, parent.id).await;
            RequireJWT::invalidate_user(request, student_id).await;
            info!("Parent {} unlinked student {}", parent.id, student_id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Child unlinked successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ChildNotLinked,
            "This student is not linked to your account",
        ))),
        Err(e) => Ok(internal_error(ErrorCode::InternalServerError, "Failed to unlink child", e)),
    }
}
