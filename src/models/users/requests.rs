use super::entities::{
    Department, Designation, Preferences, ProfilePicture, UserKind, UserRole,
};
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use serde::Deserialize;
use ts_rs::TS;

// 注册请求（角色字段按 role 选填）
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "auth.ts")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    // 学生
    pub usn: Option<String>,
    pub branch: Option<Department>,
    pub semester: Option<i32>,
    pub cgpa: Option<f64>,
    // 家长
    pub child_usn: Option<String>,
    // 教师
    pub faculty_id: Option<String>,
    pub department: Option<Department>,
    pub designation: Option<Designation>,
}

/// 存储层创建用户参数（密码已哈希）
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub kind: UserKind,
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<UserRole>,
    pub branch: Option<Department>,
    pub department: Option<Department>,
    pub semester: Option<i32>,
    pub search: Option<String>,
}

// 通用人员列表参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "user.ts")]
pub struct PeopleListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub branch: Option<Department>,
    pub department: Option<Department>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[ts(type = "number | null")]
    pub semester: Option<i64>,
    pub search: Option<String>,
}

impl PeopleListParams {
    pub fn into_query(self, role: UserRole) -> UserListQuery {
        UserListQuery {
            page: Some(self.pagination.page),
            size: Some(self.pagination.size),
            role: Some(role),
            branch: self.branch,
            department: self.department,
            semester: self.semester.map(|s| s as i32),
            search: self.search,
        }
    }
}

// 基础资料更新（姓名 / 邮箱）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "user.ts")]
pub struct UpdateBasicInfoRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// 存储层用户更新参数，`None` 表示不修改
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    // 学生
    pub usn: Option<String>,
    pub branch: Option<Department>,
    pub semester: Option<i32>,
    pub cgpa: Option<f64>,
    pub attendance_percentage: Option<f64>,
    // 家长
    pub child_usn: Option<Option<String>>,
    // 教师
    pub faculty_id: Option<String>,
    pub department: Option<Department>,
    pub designation: Option<Designation>,
    pub is_admin: Option<bool>,
    // 资料
    pub profile_picture: Option<Option<ProfilePicture>>,
    pub preferences: Option<Preferences>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.usn.is_none()
            && self.branch.is_none()
            && self.semester.is_none()
            && self.cgpa.is_none()
            && self.attendance_percentage.is_none()
            && self.child_usn.is_none()
            && self.faculty_id.is_none()
            && self.department.is_none()
            && self.designation.is_none()
            && self.is_admin.is_none()
            && self.profile_picture.is_none()
            && self.preferences.is_none()
    }
}
