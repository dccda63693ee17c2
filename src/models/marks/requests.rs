use crate::models::common::pagination::deserialize_optional_i64;
use serde::Deserialize;
use ts_rs::TS;

// 录入成绩
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "marks.ts")]
pub struct CreateMarkRequest {
    pub student_id: i64,
    pub course_id: i64,
    /// 缺省时使用课程名称
    pub subject_name: Option<String>,
    pub score: f64,
    /// 缺省时按分数推导
    pub grade: Option<String>,
}

// 修改成绩
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "marks.ts")]
pub struct UpdateMarkRequest {
    pub subject_name: Option<String>,
    pub score: Option<f64>,
    pub grade: Option<String>,
}

// 考勤录入（按学生+课程+科目 upsert）
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "marks.ts")]
pub struct AttendanceRequest {
    pub student_id: i64,
    pub course_id: i64,
    pub subject_name: Option<String>,
    pub total_classes: i32,
    pub attended_classes: i32,
}

// 导出参数
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "marks.ts")]
pub struct MarksExportParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[ts(type = "number | null")]
    pub course_id: Option<i64>,
}

/// 存储层新增成绩参数
#[derive(Debug, Clone)]
pub struct NewMark {
    pub student_id: i64,
    pub course_id: i64,
    pub subject_name: String,
    pub score: f64,
    pub grade: String,
    pub uploaded_by: i64,
}

/// 存储层考勤 upsert 参数
#[derive(Debug, Clone)]
pub struct AttendanceUpsert {
    pub student_id: i64,
    pub course_id: i64,
    pub subject_name: String,
    pub total_classes: i32,
    pub attended_classes: i32,
}
