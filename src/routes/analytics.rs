use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::analytics::requests::{AttendanceTrendParams, RankingParams};
use crate::models::users::entities::UserRole;
use crate::services::AnalyticsService;

static ANALYTICS_SERVICE: Lazy<AnalyticsService> = Lazy::new(AnalyticsService::new_lazy);

pub async fn rankings(
    req: HttpRequest,
    query: web::Query<RankingParams>,
) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.rankings(query.into_inner(), &req).await
}

pub async fn at_risk(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.at_risk(&req).await
}

pub async fn department_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.department_stats(&req).await
}

pub async fn course_performance(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.course_performance(&req).await
}

pub async fn attendance_trends(
    req: HttpRequest,
    query: web::Query<AttendanceTrendParams>,
) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE
        .attendance_trends(query.into_inner(), &req)
        .await
}

pub async fn overview(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.overview(&req).await
}

// 配置路由
pub fn configure_analytics_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/analytics")
            .wrap(RequireRole::new(&UserRole::Teacher))
            .wrap(RequireJWT)
            .route("/rankings", web::get().to(rankings))
            .route("/at-risk", web::get().to(at_risk))
            .route("/department-stats", web::get().to(department_stats))
            .route("/course-performance", web::get().to(course_performance))
            .route("/attendance-trends", web::get().to(attendance_trends))
            .route("/overview", web::get().to(overview)),
    );
}
