use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RateLimit, RequireJWT};
use crate::models::two_factor::{DisableTwoFactorRequest, TwoFactorTokenRequest};
use crate::services::TwoFactorService;

static TWO_FACTOR_SERVICE: Lazy<TwoFactorService> = Lazy::new(TwoFactorService::new_lazy);

pub async fn status(req: HttpRequest) -> ActixResult<HttpResponse> {
    TWO_FACTOR_SERVICE.status(&req).await
}

pub async fn setup(req: HttpRequest) -> ActixResult<HttpResponse> {
    TWO_FACTOR_SERVICE.setup(&req).await
}

pub async fn verify(
    req: HttpRequest,
    body: web::Json<TwoFactorTokenRequest>,
) -> ActixResult<HttpResponse> {
    TWO_FACTOR_SERVICE.verify(body.into_inner(), &req).await
}

pub async fn disable(
    req: HttpRequest,
    body: web::Json<DisableTwoFactorRequest>,
) -> ActixResult<HttpResponse> {
    TWO_FACTOR_SERVICE.disable(body.into_inner(), &req).await
}

pub async fn regenerate_backup_codes(
    req: HttpRequest,
    body: web::Json<TwoFactorTokenRequest>,
) -> ActixResult<HttpResponse> {
    TWO_FACTOR_SERVICE
        .regenerate_backup_codes(body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_two_factor_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/2fa")
            .wrap(RequireJWT)
            .route("/status", web::get().to(status))
            .route("/setup", web::post().to(setup))
            .route("/verify", web::post().to(verify).wrap(RateLimit::two_factor()))
            .route("/disable", web::post().to(disable).wrap(RateLimit::two_factor()))
            .route(
                "/backup-codes",
                web::post().to(regenerate_backup_codes).wrap(RateLimit::two_factor()),
            ),
    );
}
