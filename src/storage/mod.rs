use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::{
    announcements::{
        Announcement, AnnouncementListResponse, CreateAnnouncementRequest,
        UpdateAnnouncementRequest,
    },
    courses::{
        entities::{Assignment, Course, CourseMaterial, Exam},
        requests::{CourseListQuery, CreateCourseRequest, NewCourseMaterial, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    internal_marks::{
        entities::{InternalMarks, InternalMarksView},
        requests::InternalMarksUpsert,
    },
    marks::{
        entities::{Attendance, Mark, MarkView},
        requests::{AttendanceUpsert, NewMark, UpdateMarkRequest},
    },
    users::{
        entities::{TrustedDevice, User, UserRole},
        requests::{NewUser, UserListQuery, UserUpdate},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

/// 备用码记录（只含哈希）
#[derive(Debug, Clone)]
pub struct BackupCodeRecord {
    pub id: i64,
    pub code_hash: String,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: NewUser) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过 USN 获取学生
    async fn get_student_by_usn(&self, usn: &str) -> Result<Option<User>>;
    // 通过工号获取教师
    async fn get_teacher_by_faculty_id(&self, faculty_id: &str) -> Result<Option<User>>;
    // 分页列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 列出某角色全部用户
    async fn list_users_by_role(&self, role: UserRole) -> Result<Vec<User>>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;
    async fn count_users_by_role(&self, role: UserRole) -> Result<u64>;

    /// 登录安全
    // 记录登录失败
    async fn record_login_failure(
        &self,
        id: i64,
        attempts: i32,
        lock_until: Option<DateTime<Utc>>,
    ) -> Result<()>;
    // 清零失败计数并解除锁定
    async fn reset_login_attempts(&self, id: i64) -> Result<()>;
    // 记录登录成功
    async fn record_login_success(&self, id: i64, ip: Option<String>) -> Result<()>;
    // 覆盖受信任设备列表
    async fn set_trusted_devices(&self, id: i64, devices: &[TrustedDevice]) -> Result<()>;

    /// 两步验证
    // 写入（或清除）密钥与启用状态
    async fn set_two_factor(&self, id: i64, enabled: bool, secret: Option<String>) -> Result<()>;
    // 记录最近一次使用时间
    async fn touch_two_factor(&self, id: i64) -> Result<()>;
    async fn get_two_factor_last_used(&self, id: i64) -> Result<Option<DateTime<Utc>>>;
    // 替换备用码（旧码全部删除）
    async fn replace_backup_codes(&self, user_id: i64, code_hashes: Vec<String>) -> Result<()>;
    async fn list_unused_backup_codes(&self, user_id: i64) -> Result<Vec<BackupCodeRecord>>;
    // 消费备用码，仅当尚未使用时成功
    async fn consume_backup_code(&self, code_id: i64) -> Result<bool>;
    async fn count_unused_backup_codes(&self, user_id: i64) -> Result<u64>;

    /// 家长-子女
    // 关联子女（事务内同时更新学生与家长）
    async fn link_child(&self, parent_id: i64, student_id: i64) -> Result<bool>;
    async fn unlink_child(&self, parent_id: i64, student_id: i64) -> Result<bool>;
    async fn list_children(&self, parent_id: i64) -> Result<Vec<User>>;
    async fn is_parent_of(&self, parent_id: i64, student_id: i64) -> Result<bool>;

    /// 课程管理方法
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    async fn list_all_courses(&self) -> Result<Vec<Course>>;
    async fn list_courses_by_teacher(&self, teacher_id: i64) -> Result<Vec<Course>>;
    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>>;
    async fn delete_course(&self, id: i64) -> Result<bool>;
    async fn add_course_assignment(&self, id: i64, assignment: Assignment)
    -> Result<Option<Course>>;
    async fn add_course_exam(&self, id: i64, exam: Exam) -> Result<Option<Course>>;

    /// 选课
    // 已选返回 false
    async fn enroll_student(&self, course_id: i64, student_id: i64) -> Result<bool>;
    async fn unenroll_student(&self, course_id: i64, student_id: i64) -> Result<bool>;
    async fn list_course_students(&self, course_id: i64) -> Result<Vec<User>>;
    async fn list_student_courses(&self, student_id: i64) -> Result<Vec<Course>>;
    // 全部 (course_id, student_id)
    async fn list_enrollments(&self) -> Result<Vec<(i64, i64)>>;

    /// 课程资料
    async fn create_course_material(&self, material: NewCourseMaterial) -> Result<CourseMaterial>;
    async fn get_course_material(&self, id: i64) -> Result<Option<CourseMaterial>>;
    async fn list_course_materials(&self, course_id: i64) -> Result<Vec<CourseMaterial>>;
    async fn delete_course_material(&self, id: i64) -> Result<bool>;

    /// 成绩
    async fn create_mark(&self, mark: NewMark) -> Result<Mark>;
    async fn get_mark_by_id(&self, id: i64) -> Result<Option<Mark>>;
    async fn update_mark(&self, id: i64, update: UpdateMarkRequest) -> Result<Option<Mark>>;
    async fn delete_mark(&self, id: i64) -> Result<bool>;
    async fn list_marks_by_student(&self, student_id: i64) -> Result<Vec<MarkView>>;
    async fn list_marks_by_course(&self, course_id: i64) -> Result<Vec<MarkView>>;
    // 导出用，可按课程过滤
    async fn list_mark_views(&self, course_id: Option<i64>) -> Result<Vec<MarkView>>;
    async fn list_all_marks(&self) -> Result<Vec<Mark>>;

    /// 考勤
    // 返回 (记录, 是否新建)
    async fn upsert_attendance(&self, record: AttendanceUpsert) -> Result<(Attendance, bool)>;
    async fn list_attendance_by_student(&self, student_id: i64) -> Result<Vec<Attendance>>;
    async fn list_all_attendance(&self) -> Result<Vec<Attendance>>;
    async fn list_attendance_since(&self, since: DateTime<Utc>) -> Result<Vec<Attendance>>;
    // 按考勤记录重算学生总出勤率
    async fn recompute_student_attendance(&self, student_id: i64) -> Result<f64>;

    /// 内部评估成绩
    async fn upsert_internal_marks(
        &self,
        record: InternalMarksUpsert,
    ) -> Result<(InternalMarks, bool)>;
    async fn get_internal_marks_by_id(&self, id: i64) -> Result<Option<InternalMarks>>;
    async fn list_internal_marks_by_course(&self, course_id: i64)
    -> Result<Vec<InternalMarksView>>;
    async fn list_internal_marks_by_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<InternalMarksView>>;
    async fn delete_internal_marks(&self, id: i64) -> Result<bool>;

    /// 公告
    async fn create_announcement(
        &self,
        teacher_id: i64,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement>;
    async fn get_announcement_by_id(&self, id: i64) -> Result<Option<Announcement>>;
    async fn list_announcements_with_pagination(
        &self,
        page: u64,
        size: u64,
    ) -> Result<AnnouncementListResponse>;
    async fn update_announcement(
        &self,
        id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>>;
    async fn delete_announcement(&self, id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
