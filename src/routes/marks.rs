use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RateLimit, RequireJWT, RequireRole};
use crate::models::marks::requests::{
    AttendanceRequest, CreateMarkRequest, MarksExportParams, UpdateMarkRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::MarkService;
use crate::utils::{SafeCourseIdI64, SafeIDI64, SafeStudentIdI64};

static MARK_SERVICE: Lazy<MarkService> = Lazy::new(MarkService::new_lazy);

pub async fn create_mark(
    req: HttpRequest,
    body: web::Json<CreateMarkRequest>,
) -> ActixResult<HttpResponse> {
    MARK_SERVICE.create_mark(body.into_inner(), &req).await
}

pub async fn update_mark(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateMarkRequest>,
) -> ActixResult<HttpResponse> {
    MARK_SERVICE.update_mark(id.0, body.into_inner(), &req).await
}

pub async fn delete_mark(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    MARK_SERVICE.delete_mark(id.0, &req).await
}

pub async fn list_by_student(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    MARK_SERVICE.list_by_student(student_id.0, &req).await
}

pub async fn list_by_course(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    MARK_SERVICE.list_by_course(course_id.0, &req).await
}

pub async fn upsert_attendance(
    req: HttpRequest,
    body: web::Json<AttendanceRequest>,
) -> ActixResult<HttpResponse> {
    MARK_SERVICE.upsert_attendance(body.into_inner(), &req).await
}

pub async fn attendance_by_student(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    MARK_SERVICE.attendance_by_student(student_id.0, &req).await
}

pub async fn upload_marks(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    MARK_SERVICE.upload_marks(payload, &req).await
}

pub async fn upload_attendance(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    MARK_SERVICE.upload_attendance(payload, &req).await
}

pub async fn export_marks(
    req: HttpRequest,
    query: web::Query<MarksExportParams>,
) -> ActixResult<HttpResponse> {
    MARK_SERVICE.export_marks(query.into_inner(), &req).await
}

// 配置路由
pub fn configure_mark_routes(cfg: &mut web::ServiceConfig) {
    let teacher = || RequireRole::new(&UserRole::Teacher);

    cfg.service(
        web::scope("/api/marks")
            .wrap(RequireJWT)
            // 学生本人与家长可读，归属在服务层校验
            .route("/student/{student_id}", web::get().to(list_by_student))
            .route("/attendance/student/{student_id}", web::get().to(attendance_by_student))
            .service(
                web::resource("")
                    .wrap(teacher())
                    .route(web::post().to(create_mark)),
            )
            .service(
                web::resource("/upload")
                    .wrap(teacher())
                    .route(web::post().to(upload_marks).wrap(RateLimit::file_upload())),
            )
            .service(
                web::resource("/export")
                    .wrap(teacher())
                    .route(web::get().to(export_marks)),
            )
            .service(
                web::resource("/attendance")
                    .wrap(teacher())
                    .route(web::post().to(upsert_attendance)),
            )
            .service(
                web::resource("/attendance/upload")
                    .wrap(teacher())
                    .route(web::post().to(upload_attendance).wrap(RateLimit::file_upload())),
            )
            .service(
                web::resource("/course/{course_id}")
                    .wrap(teacher())
                    .route(web::get().to(list_by_course)),
            )
            .service(
                web::resource("/{id}")
                    .wrap(teacher())
                    .route(web::put().to(update_mark))
                    .route(web::delete().to(delete_mark)),
            ),
    );
}
