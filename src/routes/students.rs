use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RateLimit, RequireJWT, RequireRole};
use crate::models::students::requests::{CreateStudentRequest, UpdateStudentRequest};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::PeopleListParams;
use crate::services::StudentService;
use crate::utils::SafeIDI64;

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<PeopleListParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(query.into_inner(), &req).await
}

pub async fn get_student(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(id.0, &req).await
}

pub async fn get_student_marks(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student_marks(id.0, &req).await
}

pub async fn get_student_attendance(
    req: HttpRequest,
    id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student_attendance(id.0, &req).await
}

pub async fn create_student(
    req: HttpRequest,
    body: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.create_student(body.into_inner(), &req).await
}

pub async fn update_student(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_student(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(id.0, &req).await
}

pub async fn import_students(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.import_students(payload, &req).await
}

pub async fn export_students(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.export_students(&req).await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/students")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .wrap(RequireRole::new(&UserRole::Teacher))
                    .route(web::get().to(list_students))
                    .route(web::post().to(create_student)),
            )
            .service(
                web::resource("/upload")
                    .wrap(RequireRole::new(&UserRole::Teacher))
                    .route(web::post().to(import_students).wrap(RateLimit::file_upload())),
            )
            .service(
                web::resource("/export")
                    .wrap(RequireRole::new(&UserRole::Teacher))
                    .route(web::get().to(export_students)),
            )
            // 查看接口对本人、家长与教师开放，归属在服务层校验
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_student))
                    .route(web::put().to(update_student).wrap(RequireRole::new(&UserRole::Teacher)))
                    .route(web::delete().to(delete_student).wrap(RequireRole::new(&UserRole::Teacher))),
            )
            .route("/{id}/marks", web::get().to(get_student_marks))
            .route("/{id}/attendance", web::get().to(get_student_attendance)),
    );
}
