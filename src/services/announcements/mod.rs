pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::announcements::{
    Announcement, AnnouncementListParams, CreateAnnouncementRequest, UpdateAnnouncementRequest,
};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::internal_error;
use crate::storage::Storage;

pub struct AnnouncementService {
    storage: Option<Arc<dyn Storage>>,
}

impl AnnouncementService {
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

    pub async fn list(
        &self,
        params: AnnouncementListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_announcements(self, params, request).await
    }

    pub async fn create(
        &self,
        body: CreateAnnouncementRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_announcement(self, body, request).await
    }

    pub async fn update(
        &self,
        id: i64,
        body: UpdateAnnouncementRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_announcement(self, id, body, request).await
    }

    pub async fn delete(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_announcement(self, id, request).await
    }
}

/// 加载公告并确认当前用户是作者或管理员
pub(crate) async fn load_own_announcement(
    storage: &Arc<dyn Storage>,
    user: &User,
    id: i64,
) -> Result<Announcement, HttpResponse> {
    let announcement = match storage.get_announcement_by_id(id).await {
        Ok(Some(announcement)) => announcement,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AnnouncementNotFound,
                "Announcement not found",
            )));
        }
        Err(e) => {
            return Err(internal_error(ErrorCode::InternalServerError, "Failed to load announcement", e));
        }
    };

    if announcement.teacher_id != user.id && !user.is_admin() {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only the author or an administrator can modify this announcement",
        )));
    }
    Ok(announcement)
}

pub(crate) fn validate_announcement(title: Option<&str>, content: Option<&str>) -> Result<(), &'static str> {
    if let Some(title) = title {
        let len = title.trim().chars().count();
        if len == 0 || len > 200 {
            return Err("Title must be 1-200 characters");
        }
    }
    if let Some(content) = content
        && content.trim().is_empty()
    {
        return Err("Content is required");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_announcement() {
        assert!(validate_announcement(Some("Exam schedule"), Some("Starts Monday")).is_ok());
        assert!(validate_announcement(Some(" "), None).is_err());
        assert!(validate_announcement(None, Some("")).is_err());
        assert!(validate_announcement(Some(&"x".repeat(201)), None).is_err());
        assert!(validate_announcement(None, None).is_ok());
    }
}
