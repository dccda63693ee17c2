use crate::models::courses::entities::Course;
use crate::models::internal_marks::entities::InternalMarksView;
use crate::models::marks::entities::{Attendance, MarkView};
use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

// 学生仪表盘
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "student.ts")]
pub struct StudentDashboardResponse {
    pub student: User,
    pub courses: Vec<Course>,
    pub recent_marks: Vec<MarkView>,
    pub attendance: Vec<Attendance>,
    pub internal_marks: Vec<InternalMarksView>,
    pub average_score: f64,
    pub attendance_percentage: f64,
}

// 学生成绩
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "student.ts")]
pub struct StudentMarksResponse {
    pub student_id: i64,
    pub marks: Vec<MarkView>,
    pub average_score: f64,
}

// 学生考勤
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "student.ts")]
pub struct StudentAttendanceResponse {
    pub student_id: i64,
    pub records: Vec<Attendance>,
    pub overall_percentage: f64,
}
