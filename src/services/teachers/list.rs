use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use crate::models::users::{entities::UserRole, requests::PeopleListParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::internal_error;

pub async fn list_teachers(
    service: &TeacherService,
    query: PeopleListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service
        .get_storage(request)
        .list_users_with_pagination(query.into_query(UserRole::Teacher))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Teachers retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve teachers",
            e,
        )),
    }
}
