use crate::models::users::entities::{Department, Designation};
use serde::Deserialize;
use ts_rs::TS;

// 教师信息更新（is_admin 仅管理员可修改）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "teacher.ts")]
pub struct UpdateTeacherRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub faculty_id: Option<String>,
    pub department: Option<Department>,
    pub designation: Option<Designation>,
    pub is_admin: Option<bool>,
}
