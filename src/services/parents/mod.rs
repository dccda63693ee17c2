pub mod children;
pub mod list;
pub mod records;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::parents::LinkChildRequest;
use crate::models::users::requests::PeopleListParams;
use crate::storage::Storage;

pub struct ParentService {
    storage: Option<Arc<dyn Storage>>,
}

impl ParentService {
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

    pub async fn list_children(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        children::list_children(self, request).await
    }

    pub async fn link_child(
        &self,
        body: LinkChildRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        children::link_child(self, body, request).await
    }

    pub async fn unlink_child(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        children::unlink_child(self, student_id, request).await
    }

    pub async fn child_marks(&self, student_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        records::child_marks(self, student_id, request).await
    }

    pub async fn child_attendance(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        records::child_attendance(self, student_id, request).await
    }

    pub async fn child_internal_marks(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        records::child_internal_marks(self, student_id, request).await
    }

    // 教师查看家长列表
    pub async fn list_parents(
        &self,
        query: PeopleListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_parents(self, query, request).await
    }
}
