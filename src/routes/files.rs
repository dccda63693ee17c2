use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::config::AppConfig;
use crate::services::FileService;

static FILE_SERVICE: Lazy<FileService> = Lazy::new(FileService::new_lazy);

pub async fn serve_upload(
    req: HttpRequest,
    file_name: web::Path<String>,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE.serve(file_name.into_inner(), &req).await
}

// 配置路由：上传文件按配置的公开前缀访问
pub fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    let prefix = AppConfig::get()
        .upload
        .public_path
        .trim_end_matches('/')
        .to_string();
    cfg.service(web::scope(&prefix).route("/{file_name}", web::get().to(serve_upload)));
}
