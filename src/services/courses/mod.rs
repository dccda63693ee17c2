pub mod coursework;
pub mod create;
pub mod delete;
pub mod enrollment;
pub mod get;
pub mod list;
pub mod materials;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::courses::{
    entities::Course,
    requests::{
        CourseListParams, CreateAssignmentRequest, CreateCourseRequest, CreateExamRequest,
        EnrollRequest, UpdateCourseRequest,
    },
};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::internal_error;
use crate::storage::Storage;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
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

    pub async fn list_courses(
        &self,
        query: CourseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, query, request).await
    }

    pub async fn get_course(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_course(self, id, request).await
    }

    pub async fn create_course(
        &self,
        body: CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, body, request).await
    }

    pub async fn update_course(
        &self,
        id: i64,
        body: UpdateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_course(self, id, body, request).await
    }

    pub async fn delete_course(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_course(self, id, request).await
    }

    pub async fn enroll(
        &self,
        id: i64,
        body: EnrollRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollment::enroll(self, id, body, request).await
    }

    pub async fn unenroll(
        &self,
        id: i64,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollment::unenroll(self, id, student_id, request).await
    }

    pub async fn upload_material(
        &self,
        id: i64,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        materials::upload_material(self, id, payload, request).await
    }

    pub async fn delete_material(
        &self,
        id: i64,
        material_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        materials::delete_material(self, id, material_id, request).await
    }

    pub async fn add_assignment(
        &self,
        id: i64,
        body: CreateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        coursework::add_assignment(self, id, body, request).await
    }

    pub async fn add_exam(
        &self,
        id: i64,
        body: CreateExamRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        coursework::add_exam(self, id, body, request).await
    }
}

/// 按 ID 加载课程
pub(crate) async fn load_course(storage: &Arc<dyn Storage>, id: i64) -> Result<Course, HttpResponse> {
    match storage.get_course_by_id(id).await {
        Ok(Some(course)) => Ok(course),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Err(internal_error(ErrorCode::InternalServerError, "Failed to load course", e)),
    }
}

/// 授课教师或管理员才能修改课程
pub(crate) fn can_manage(user: &User, course: &Course) -> bool {
    user.is_admin() || (user.is_teacher() && course.teacher_id == Some(user.id))
}

pub(crate) fn check_can_manage(user: &User, course: &Course) -> Result<(), HttpResponse> {
    if can_manage(user, course) {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CoursePermissionDenied,
            "Only the course teacher or an administrator can modify this course",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::entities::SubjectType;
    use crate::models::users::entities::{
        Department, Designation, ParentProfile, TeacherProfile, UserKind,
    };
    use chrono::Utc;

    fn course(teacher_id: Option<i64>) -> Course {
        Course {
            id: 1,
            code: "CS501".into(),
            title: "DBMS".into(),
            description: None,
            credits: 4,
            department: Department::Cse,
            semester: 5,
            subject_type: SubjectType::Theory,
            teacher_id,
            schedule: vec![],
            assignments: vec![],
            exams: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn teacher(id: i64, is_admin: bool) -> User {
        User::fixture(
            id,
            UserKind::Teacher(TeacherProfile {
                faculty_id: format!("FAC{id}"),
                department: Department::Cse,
                designation: Designation::AssistantProfessor,
                is_admin,
            }),
        )
    }

    #[test]
    fn test_owner_or_admin_can_manage() {
        assert!(can_manage(&teacher(7, false), &course(Some(7))));
        assert!(!can_manage(&teacher(8, false), &course(Some(7))));
        assert!(can_manage(&teacher(8, true), &course(Some(7))));
        assert!(!can_manage(&teacher(8, false), &course(None)));

        let parent = User::fixture(7, UserKind::Parent(ParentProfile { child_usn: None }));
        assert!(!can_manage(&parent, &course(Some(7))));
    }
}
