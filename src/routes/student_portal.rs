use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::users::entities::UserRole;
use crate::services::StudentPortalService;

static STUDENT_PORTAL_SERVICE: Lazy<StudentPortalService> =
    Lazy::new(StudentPortalService::new_lazy);

pub async fn dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_PORTAL_SERVICE.dashboard(&req).await
}

pub async fn marks(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_PORTAL_SERVICE.marks(&req).await
}

pub async fn attendance(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_PORTAL_SERVICE.attendance(&req).await
}

pub async fn courses(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_PORTAL_SERVICE.courses(&req).await
}

pub async fn internal_marks(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_PORTAL_SERVICE.internal_marks(&req).await
}

// 配置路由
pub fn configure_student_portal_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/student")
            .wrap(RequireRole::new(&UserRole::Student))
            .wrap(RequireJWT)
            .route("/dashboard", web::get().to(dashboard))
            .route("/marks", web::get().to(marks))
            .route("/attendance", web::get().to(attendance))
            .route("/courses", web::get().to(courses))
            .route("/internal-marks", web::get().to(internal_marks)),
    );
}
