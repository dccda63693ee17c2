use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::{Department, string_enum};

string_enum! {
    /// 课程类型，决定 CIE 的计算方式
    #[ts(export, export_to = "course.ts")]
    pub enum SubjectType {
        Theory => "theory",
        TheoryLab => "theoryLab",
        Lab => "lab",
    }
}

// 课表条目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "course.ts")]
pub struct ScheduleEntry {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
}

// 课程作业
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "course.ts")]
pub struct Assignment {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub max_marks: f64,
}

// 课程考试
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "course.ts")]
pub struct Exam {
    pub name: String,
    pub date: Option<DateTime<Utc>>,
    pub max_marks: f64,
}

// 课程实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "course.ts")]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub credits: i32,
    pub department: Department,
    pub semester: i32,
    pub subject_type: SubjectType,
    pub teacher_id: Option<i64>,
    pub schedule: Vec<ScheduleEntry>,
    pub assignments: Vec<Assignment>,
    pub exams: Vec<Exam>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 课程资料
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "course.ts")]
pub struct CourseMaterial {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub original_name: String,
    /// 磁盘上的存储文件名
    pub filename: String,
    pub url: String,
    pub file_size: i64,
    pub uploaded_by: Option<i64>,
    pub uploaded_at: DateTime<Utc>,
}
