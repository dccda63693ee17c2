use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::courses::entities::SubjectType;

/// CIE 原始分项（三种课程类型字段的并集）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "internal_marks.ts")]
pub struct CieComponents {
    // theory
    pub test1: Option<f64>,
    pub test2: Option<f64>,
    pub assignment1: Option<f64>,
    pub seminar2: Option<f64>,
    // theoryLab
    pub theory_test1: Option<f64>,
    pub theory_test2: Option<f64>,
    pub theory_assignment1: Option<f64>,
    pub theory_seminar: Option<f64>,
    pub conduction: Option<f64>,
    pub record: Option<f64>,
    pub lab_test: Option<f64>,
    // lab
    pub conduction_viva: Option<f64>,
    pub record_journal: Option<f64>,
    pub lab_test_only: Option<f64>,
}

// 内部评估成绩
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "internal_marks.ts")]
pub struct InternalMarks {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub subject_type: SubjectType,
    #[serde(flatten)]
    #[ts(flatten)]
    pub components: CieComponents,
    #[serde(rename = "calculatedCIE")]
    pub calculated_cie: f64,
    pub uploaded_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 带学生信息的视图（按课程列出时使用）
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "internal_marks.ts")]
pub struct InternalMarksView {
    #[serde(flatten)]
    #[ts(flatten)]
    pub record: InternalMarks,
    pub student_name: Option<String>,
    pub usn: Option<String>,
    pub course_code: Option<String>,
    pub course_title: Option<String>,
}
