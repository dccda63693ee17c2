use crate::models::users::entities::Department;
use serde::Deserialize;
use ts_rs::TS;

// 教师创建学生
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "student.ts")]
pub struct CreateStudentRequest {
    pub name: String,
    pub email: String,
    /// 缺省时使用 USN 作为初始密码
    pub password: Option<String>,
    pub usn: String,
    pub branch: Department,
    pub semester: i32,
    pub cgpa: Option<f64>,
    pub attendance_percentage: Option<f64>,
}

// 学生信息更新（只更新提供的字段）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "student.ts")]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub usn: Option<String>,
    pub branch: Option<Department>,
    pub semester: Option<i32>,
    pub cgpa: Option<f64>,
    pub attendance_percentage: Option<f64>,
}

impl UpdateStudentRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.usn.is_none()
            && self.branch.is_none()
            && self.semester.is_none()
            && self.cgpa.is_none()
            && self.attendance_percentage.is_none()
    }
}
