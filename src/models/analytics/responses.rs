use serde::Serialize;
use ts_rs::TS;

use crate::models::users::entities::Department;

// 学生排名
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "analytics.ts")]
pub struct StudentRanking {
    pub rank: usize,
    pub student_id: i64,
    pub name: String,
    pub usn: String,
    pub branch: Department,
    pub semester: i32,
    pub total_score: f64,
    pub average_score: f64,
    pub marks_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "analytics.ts")]
pub enum RiskLevel {
    High,
    Medium,
}

// 风险学生
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "analytics.ts")]
pub struct AtRiskStudent {
    pub student_id: i64,
    pub name: String,
    pub usn: String,
    pub branch: Department,
    pub semester: i32,
    pub avg_attendance: Option<f64>,
    pub avg_score: Option<f64>,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
}

// 院系统计
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "analytics.ts")]
pub struct DepartmentStats {
    pub branch: Department,
    pub student_count: usize,
    pub avg_cgpa: f64,
    pub avg_attendance: f64,
}

// 课程表现
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "analytics.ts")]
pub struct CoursePerformance {
    pub course_id: i64,
    pub code: String,
    pub title: String,
    pub average_score: f64,
    pub average_attendance: f64,
    pub pass_rate: f64,
    pub marks_count: usize,
    pub enrolled_count: usize,
}

// 月度考勤趋势
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "analytics.ts")]
pub struct AttendanceTrend {
    pub year: i32,
    pub month: u32,
    pub average_attendance: f64,
    pub records: usize,
}

// 总览
#[derive(Debug, Clone, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "analytics.ts")]
pub struct OverviewStats {
    pub total_students: usize,
    pub total_teachers: usize,
    pub total_parents: usize,
    pub total_courses: usize,
    pub total_marks: usize,
    pub average_score: f64,
    pub average_attendance: f64,
    pub at_risk_count: usize,
}
