use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RateLimit, RequireJWT, RequireRole};
use crate::models::courses::requests::{
    CourseListParams, CreateAssignmentRequest, CreateCourseRequest, CreateExamRequest,
    EnrollRequest, UpdateCourseRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CourseService;
use crate::utils::{SafeIDI64, SafeMaterialIdI64, SafeStudentIdI64};

static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn get_course(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(id.0, &req).await
}

pub async fn create_course(
    req: HttpRequest,
    body: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.create_course(body.into_inner(), &req).await
}

pub async fn update_course(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_course(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(id.0, &req).await
}

pub async fn enroll(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<EnrollRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.enroll(id.0, body.into_inner(), &req).await
}

pub async fn unenroll(
    req: HttpRequest,
    id: SafeIDI64,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.unenroll(id.0, student_id.0, &req).await
}

pub async fn upload_material(
    req: HttpRequest,
    id: SafeIDI64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.upload_material(id.0, payload, &req).await
}

pub async fn delete_material(
    req: HttpRequest,
    id: SafeIDI64,
    material_id: SafeMaterialIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .delete_material(id.0, material_id.0, &req)
        .await
}

pub async fn add_assignment(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .add_assignment(id.0, body.into_inner(), &req)
        .await
}

pub async fn add_exam(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<CreateExamRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.add_exam(id.0, body.into_inner(), &req).await
}

// 配置路由
pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/courses")
            .wrap(RequireJWT)
            // 所有角色可读，写操作限教师（课程归属在服务层校验）
            .service(
                web::resource("")
                    .route(web::get().to(list_courses))
                    .route(web::post().to(create_course).wrap(RequireRole::new(&UserRole::Teacher))),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_course))
                    .route(web::put().to(update_course).wrap(RequireRole::new(&UserRole::Teacher)))
                    .route(web::delete().to(delete_course).wrap(RequireRole::new(&UserRole::Teacher))),
            )
            .service(
                web::scope("/{id}")
                    .wrap(RequireRole::new(&UserRole::Teacher))
                    .route("/enroll", web::post().to(enroll))
                    .route("/enroll/{student_id}", web::delete().to(unenroll))
                    .route(
                        "/materials",
                        web::post().to(upload_material).wrap(RateLimit::file_upload()),
                    )
                    .route("/materials/{material_id}", web::delete().to(delete_material))
                    .route("/assignments", web::post().to(add_assignment))
                    .route("/exams", web::post().to(add_exam)),
            ),
    );
}
