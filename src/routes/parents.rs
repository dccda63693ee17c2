use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::parents::LinkChildRequest;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::PeopleListParams;
use crate::services::ParentService;
use crate::utils::SafeStudentIdI64;

static PARENT_SERVICE: Lazy<ParentService> = Lazy::new(ParentService::new_lazy);

pub async fn list_parents(
    req: HttpRequest,
    query: web::Query<PeopleListParams>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.list_parents(query.into_inner(), &req).await
}

pub async fn list_children(req: HttpRequest) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.list_children(&req).await
}

pub async fn link_child(
    req: HttpRequest,
    body: web::Json<LinkChildRequest>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.link_child(body.into_inner(), &req).await
}

pub async fn unlink_child(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.unlink_child(student_id.0, &req).await
}

pub async fn child_marks(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.child_marks(student_id.0, &req).await
}

pub async fn child_attendance(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.child_attendance(student_id.0, &req).await
}

pub async fn child_internal_marks(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.child_internal_marks(student_id.0, &req).await
}

// 配置路由
pub fn configure_parent_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/parents")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .wrap(RequireRole::new(&UserRole::Teacher))
                    .route(web::get().to(list_parents)),
            )
            .service(
                web::scope("/children")
                    .wrap(RequireRole::new(&UserRole::Parent))
                    .route("", web::get().to(list_children))
                    .route("", web::post().to(link_child))
                    .route("/{student_id}", web::delete().to(unlink_child))
                    .route("/{student_id}/marks", web::get().to(child_marks))
                    .route("/{student_id}/attendance", web::get().to(child_attendance))
                    .route("/{student_id}/internal-marks", web::get().to(child_internal_marks)),
            ),
    );
}
