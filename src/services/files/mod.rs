//! 上传目录的只读访问
//!
//! 头像与课程资料保存为 `{时间戳}-{uuid}.{扩展名}`，通过 `/uploads/{file}` 公开访问。

pub mod serve;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

pub struct FileService;

impl FileService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn serve(&self, file_name: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        serve::serve_upload(file_name, request).await
    }
}
