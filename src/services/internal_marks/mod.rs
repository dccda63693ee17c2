pub mod delete;
pub mod export;
pub mod import;
pub mod list;
pub mod scoring;
pub mod upsert;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::internal_marks::requests::{InternalMarksRequest, InternalMarksUploadParams};
use crate::storage::Storage;

pub struct InternalMarksService {
    storage: Option<Arc<dyn Storage>>,
}

impl InternalMarksService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 单条录入（按学生+课程覆盖）
    pub async fn upsert(
        &self,
        body: InternalMarksRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        upsert::upsert_internal_marks(self, body, request).await
    }

    // 批量上传
    pub async fn upload(
        &self,
        params: InternalMarksUploadParams,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        import::import_internal_marks(self, params, payload, request).await
    }

    pub async fn list_by_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_by_course(self, course_id, request).await
    }

    pub async fn list_by_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_by_student(self, student_id, request).await
    }

    pub async fn export(&self, course_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        export::export_course(self, course_id, request).await
    }

    pub async fn template(&self, subject_type: String) -> ActixResult<HttpResponse> {
        export::download_template(&subject_type).await
    }

    pub async fn delete(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_internal_marks(self, id, request).await
    }
}
