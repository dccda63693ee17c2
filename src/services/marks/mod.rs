pub mod attendance;
pub mod attendance_import;
pub mod create;
pub mod delete;
pub mod export;
pub mod import;
pub mod list;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::marks::requests::{
    AttendanceRequest, CreateMarkRequest, MarksExportParams, UpdateMarkRequest,
};
use crate::storage::Storage;

pub struct MarkService {
    storage: Option<Arc<dyn Storage>>,
}

impl MarkService {
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

    pub async fn create_mark(
        &self,
        body: CreateMarkRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_mark(self, body, request).await
    }

    pub async fn update_mark(
        &self,
        id: i64,
        body: UpdateMarkRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_mark(self, id, body, request).await
    }

    pub async fn delete_mark(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_mark(self, id, request).await
    }

    pub async fn list_by_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_by_student(self, student_id, request).await
    }

    pub async fn list_by_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_by_course(self, course_id, request).await
    }

    pub async fn upsert_attendance(
        &self,
        body: AttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attendance::upsert_attendance(self, body, request).await
    }

    pub async fn attendance_by_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attendance::attendance_by_student(self, student_id, request).await
    }

    pub async fn upload_marks(
        &self,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        import::import_marks(self, payload, request).await
    }

    pub async fn upload_attendance(
        &self,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attendance_import::import_attendance(self, payload, request).await
    }

    pub async fn export_marks(
        &self,
        params: MarksExportParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        export::export_marks(self, params, request).await
    }
}

/// 成绩等级：给定值优先（去空白、大写），否则按分数推导
pub(crate) fn resolve_grade(score: f64, grade: Option<&str>) -> String {
    grade
        .map(|g| g.trim().to_uppercase())
        .filter(|g| !g.is_empty())
        .unwrap_or_else(|| crate::models::marks::entities::Mark::grade_for(score).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_grade() {
        assert_eq!(resolve_grade(91.0, None), "S");
        assert_eq!(resolve_grade(91.0, Some(" ")), "S");
        assert_eq!(resolve_grade(55.0, Some("b+")), "B+");
    }
}
