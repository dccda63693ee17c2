use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RateLimit, RequireJWT, RequireRole};
use crate::models::internal_marks::requests::{InternalMarksRequest, InternalMarksUploadParams};
use crate::models::users::entities::UserRole;
use crate::services::InternalMarksService;
use crate::utils::{SafeCourseIdI64, SafeIDI64, SafeStudentIdI64};

static INTERNAL_MARKS_SERVICE: Lazy<InternalMarksService> =
    Lazy::new(InternalMarksService::new_lazy);

pub async fn upsert(
    req: HttpRequest,
    body: web::Json<InternalMarksRequest>,
) -> ActixResult<HttpResponse> {
    INTERNAL_MARKS_SERVICE.upsert(body.into_inner(), &req).await
}

pub async fn upload(
    req: HttpRequest,
    query: web::Query<InternalMarksUploadParams>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    INTERNAL_MARKS_SERVICE
        .upload(query.into_inner(), payload, &req)
        .await
}

pub async fn list_by_course(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    INTERNAL_MARKS_SERVICE.list_by_course(course_id.0, &req).await
}

pub async fn list_by_student(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    INTERNAL_MARKS_SERVICE.list_by_student(student_id.0, &req).await
}

pub async fn export(req: HttpRequest, course_id: SafeCourseIdI64) -> ActixResult<HttpResponse> {
    INTERNAL_MARKS_SERVICE.export(course_id.0, &req).await
}

pub async fn template(subject_type: web::Path<String>) -> ActixResult<HttpResponse> {
    INTERNAL_MARKS_SERVICE.template(subject_type.into_inner()).await
}

pub async fn delete(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    INTERNAL_MARKS_SERVICE.delete(id.0, &req).await
}

// 配置路由
pub fn configure_internal_marks_routes(cfg: &mut web::ServiceConfig) {
    let teacher = || RequireRole::new(&UserRole::Teacher);

    cfg.service(
        web::scope("/api/internal-marks")
            .wrap(RequireJWT)
            .route("/student/{student_id}", web::get().to(list_by_student))
            .service(
                web::resource("")
                    .wrap(teacher())
                    .route(web::post().to(upsert)),
            )
            .service(
                web::resource("/upload")
                    .wrap(teacher())
                    .route(web::post().to(upload).wrap(RateLimit::file_upload())),
            )
            .service(
                web::resource("/course/{course_id}")
                    .wrap(teacher())
                    .route(web::get().to(list_by_course)),
            )
            .service(
                web::resource("/export/{course_id}")
                    .wrap(teacher())
                    .route(web::get().to(export)),
            )
            .service(
                web::resource("/template/{subject_type}")
                    .wrap(teacher())
                    .route(web::get().to(template)),
            )
            .service(
                web::resource("/{id}")
                    .wrap(teacher())
                    .route(web::delete().to(delete)),
            ),
    );
}
