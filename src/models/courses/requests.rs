use super::entities::{ScheduleEntry, SubjectType};
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::models::users::entities::Department;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

// 创建课程
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "course.ts")]
pub struct CreateCourseRequest {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub credits: i32,
    pub department: Department,
    pub semester: i32,
    pub subject_type: Option<SubjectType>,
    /// 缺省时为创建者本人
    pub teacher_id: Option<i64>,
    #[serde(default)]
    pub schedule: Vec<ScheduleEntry>,
}

// 更新课程
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "course.ts")]
pub struct UpdateCourseRequest {
    pub code: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub credits: Option<i32>,
    pub department: Option<Department>,
    pub semester: Option<i32>,
    pub subject_type: Option<SubjectType>,
    pub teacher_id: Option<i64>,
    pub schedule: Option<Vec<ScheduleEntry>>,
}

// 课程列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "course.ts")]
pub struct CourseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub department: Option<Department>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[ts(type = "number | null")]
    pub semester: Option<i64>,
    pub search: Option<String>,
}

// 课程列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub department: Option<Department>,
    pub semester: Option<i32>,
    pub search: Option<String>,
}

impl From<CourseListParams> for CourseListQuery {
    fn from(params: CourseListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            department: params.department,
            semester: params.semester.map(|s| s as i32),
            search: params.search,
        }
    }
}

// 选课请求（studentId 与 usn 二选一）
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "course.ts")]
pub struct EnrollRequest {
    pub student_id: Option<i64>,
    pub usn: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "course.ts")]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub max_marks: f64,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "course.ts")]
pub struct CreateExamRequest {
    pub name: String,
    pub date: Option<DateTime<Utc>>,
    pub max_marks: f64,
}

/// 存储层新增课程资料参数
#[derive(Debug, Clone)]
pub struct NewCourseMaterial {
    pub course_id: i64,
    pub title: String,
    pub original_name: String,
    pub stored_name: String,
    pub url: String,
    pub file_size: i64,
    pub uploaded_by: i64,
}
