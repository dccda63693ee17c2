//! 学生自助：只访问当前登录学生自己的数据

pub mod dashboard;
pub mod records;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct StudentPortalService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentPortalService {
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

    pub async fn dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        dashboard::handle_dashboard(self, request).await
    }

    pub async fn marks(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        records::my_marks(self, request).await
    }

    pub async fn attendance(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        records::my_attendance(self, request).await
    }

    pub async fn courses(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        records::my_courses(self, request).await
    }

    pub async fn internal_marks(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        records::my_internal_marks(self, request).await
    }
}
