use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::users::{entities::UserRole, requests::PeopleListParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::internal_error;

pub async fn list_students(
    service: &StudentService,
    query: PeopleListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .list_users_with_pagination(query.into_query(UserRole::Student))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Students retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve students",
            e,
        )),
    }
}
