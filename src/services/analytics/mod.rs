//! 教师端统计分析
//!
//! 数据全量读出后在内存中聚合，聚合逻辑见 [`reports`]。

pub mod handlers;
pub mod reports;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::analytics::requests::{AttendanceTrendParams, RankingParams};
use crate::storage::Storage;

pub struct AnalyticsService {
    storage: Option<Arc<dyn Storage>>,
}

impl AnalyticsService {
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

    pub async fn rankings(
        &self,
        params: RankingParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::rankings(self, params, request).await
    }

    pub async fn at_risk(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        handlers::at_risk(self, request).await
    }

    pub async fn department_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        handlers::department_stats(self, request).await
    }

    pub async fn course_performance(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        handlers::course_performance(self, request).await
    }

    pub async fn attendance_trends(
        &self,
        params: AttendanceTrendParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::attendance_trends(self, params, request).await
    }

    pub async fn overview(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        handlers::overview(self, request).await
    }
}
