use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RateLimit, RequireJWT};
use crate::models::profile::{ChangePasswordRequest, UpdatePreferencesRequest};
use crate::models::users::requests::UpdateBasicInfoRequest;
use crate::services::ProfileService;

static PROFILE_SERVICE: Lazy<ProfileService> = Lazy::new(ProfileService::new_lazy);

pub async fn get_profile(req: HttpRequest) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.get_profile(&req).await
}

pub async fn update_basic_info(
    req: HttpRequest,
    body: web::Json<UpdateBasicInfoRequest>,
) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.update_basic_info(body.into_inner(), &req).await
}

pub async fn change_password(
    req: HttpRequest,
    body: web::Json<ChangePasswordRequest>,
) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.change_password(body.into_inner(), &req).await
}

pub async fn upload_picture(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.upload_picture(payload, &req).await
}

pub async fn delete_picture(req: HttpRequest) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.delete_picture(&req).await
}

pub async fn update_preferences(
    req: HttpRequest,
    body: web::Json<UpdatePreferencesRequest>,
) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.update_preferences(body.into_inner(), &req).await
}

pub async fn security_overview(req: HttpRequest) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.security_overview(&req).await
}

pub async fn remove_trusted_device(
    req: HttpRequest,
    device_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE
        .remove_trusted_device(device_id.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_profile_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/profile")
            .wrap(RequireJWT)
            .route("", web::get().to(get_profile))
            .route("", web::put().to(update_basic_info))
            .route("/password", web::put().to(change_password))
            .route(
                "/picture",
                web::post().to(upload_picture).wrap(RateLimit::file_upload()),
            )
            .route("/picture", web::delete().to(delete_picture))
            .route("/preferences", web::put().to(update_preferences))
            .route("/security", web::get().to(security_overview))
            .route(
                "/security/devices/{device_id}",
                web::delete().to(remove_trusted_device),
            ),
    );
}
