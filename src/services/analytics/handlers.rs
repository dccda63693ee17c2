use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Months, Utc};

use super::AnalyticsService;
use super::reports::{
    DEFAULT_RANKING_LIMIT, DEFAULT_TREND_MONTHS, attendance_trends as build_trends,
    course_performance as build_course_performance, department_stats as build_department_stats,
    find_at_risk, overview as build_overview, rank_students,
};
use crate::models::analytics::requests::{AttendanceTrendParams, RankingParams};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::internal_error;

/// 报表数据加载失败统一返回 500
macro_rules! load_or_500 {
    ($expr:expr, $what:literal) => {
        match $expr.await {
            Ok(value) => value,
            Err(e) => {
                return Ok(internal_error(
                    ErrorCode::InternalServerError,
                    concat!("Failed to load ", $what),
                    e,
                ));
            }
        }
    };
}

pub async fn rankings(
    service: &AnalyticsService,
    params: RankingParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let students = load_or_500!(storage.list_users_by_role(UserRole::Student), "students");
    let marks = load_or_500!(storage.list_all_marks(), "marks");
    let courses = load_or_500!(storage.list_all_courses(), "courses");

    let limit = params
        .limit
        .filter(|l| *l > 0)
        .map_or(DEFAULT_RANKING_LIMIT, |l| l as usize);
    let rankings = rank_students(
        &students,
        &marks,
        &courses,
        params.semester.map(|s| s as i32),
        params.course_id,
        limit,
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(rankings, "Rankings retrieved successfully")))
}

pub async fn at_risk(service: &AnalyticsService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let students = load_or_500!(storage.list_users_by_role(UserRole::Student), "students");
    let attendance = load_or_500!(storage.list_all_attendance(), "attendance");
    let marks = load_or_500!(storage.list_all_marks(), "marks");

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        find_at_risk(&students, &attendance, &marks),
        "At-risk students retrieved successfully",
    )))
}

pub async fn department_stats(
    service: &AnalyticsService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let students = load_or_500!(storage.list_users_by_role(UserRole::Student), "students");

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        build_department_stats(&students),
        "Department statistics retrieved successfully",
    )))
}

pub async fn course_performance(
    service: &AnalyticsService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let courses = load_or_500!(storage.list_all_courses(), "courses");
    let marks = load_or_500!(storage.list_all_marks(), "marks");
    let attendance = load_or_500!(storage.list_all_attendance(), "attendance");
    let enrollments = load_or_500!(storage.list_enrollments(), "enrollments");

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        build_course_performance(&courses, &marks, &attendance, &enrollments),
        "Course performance retrieved successfully",
    )))
}

pub async fn attendance_trends(
    service: &AnalyticsService,
    params: AttendanceTrendParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let months = params
        .months
        .filter(|m| *m > 0)
        .map_or(DEFAULT_TREND_MONTHS, |m| m.min(120) as u32);
    let now = Utc::now();
    let since = now.checked_sub_months(Months::new(months)).unwrap_or(now);

    let storage = service.get_storage(request);
    let records = load_or_500!(storage.list_attendance_since(since), "attendance");

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        build_trends(&records),
        "Attendance trends retrieved successfully",
    )))
}

pub async fn overview(service: &AnalyticsService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let students = load_or_500!(storage.list_users_by_role(UserRole::Student), "students");
    let teachers = load_or_500!(storage.count_users_by_role(UserRole::Teacher), "teachers");
    let parents = load_or_500!(storage.count_users_by_role(UserRole::Parent), "parents");
    let courses = load_or_500!(storage.list_all_courses(), "courses");
    let marks = load_or_500!(storage.list_all_marks(), "marks");
    let attendance = load_or_500!(storage.list_all_attendance(), "attendance");

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        build_overview(
            &students,
            teachers as usize,
            parents as usize,
            courses.len(),
            &marks,
            &attendance,
        ),
        "Overview retrieved successfully",
    )))
}
