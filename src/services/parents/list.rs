use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ParentService;
use crate::models::users::{entities::UserRole, requests::PeopleListParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::internal_error;

pub async fn list_parents(
    service: &ParentService,
    query: PeopleListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service
        .get_storage(request)
        .list_users_with_pagination(query.into_query(UserRole::Parent))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Parents retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve parents",
            e,
        )),
    }
}
