//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod announcements;
mod attendance;
mod courses;
mod internal_marks;
mod marks;
mod parents;
mod security;
mod users;

use crate::config::AppConfig;
use crate::errors::{CampusError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| CampusError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 单连接内存库，仅供测试
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);

        let db = Database::connect(opt)
            .await
            .map_err(|e| CampusError::database_connection(format!("内存数据库连接失败: {e}")))?;
        Migrator::up(&db, None)
            .await
            .map_err(|e| CampusError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| CampusError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| CampusError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| CampusError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(CampusError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::{BackupCodeRecord, Storage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_student_by_usn(&self, usn: &str) -> Result<Option<User>> {
        self.get_student_by_usn_impl(usn).await
    }

    async fn get_teacher_by_faculty_id(&self, faculty_id: &str) -> Result<Option<User>> {
        self.get_teacher_by_faculty_id_impl(faculty_id).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn list_users_by_role(&self, role: UserRole) -> Result<Vec<User>> {
        self.list_users_by_role_impl(role).await
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn count_users_by_role(&self, role: UserRole) -> Result<u64> {
        self.count_users_by_role_impl(role).await
    }

    // 登录安全
    async fn record_login_failure(
        &self,
        id: i64,
        attempts: i32,
        lock_until: Option<DateTime<Utc>>,
    ) -> Result<()> {
        self.record_login_failure_impl(id, attempts, lock_until)
            .await
    }

    async fn reset_login_attempts(&self, id: i64) -> Result<()> {
        self.reset_login_attempts_impl(id).await
    }

    async fn record_login_success(&self, id: i64, ip: Option<String>) -> Result<()> {
        self.record_login_success_impl(id, ip).await
    }

    async fn set_trusted_devices(&self, id: i64, devices: &[TrustedDevice]) -> Result<()> {
        self.set_trusted_devices_impl(id, devices).await
    }

    // 两步验证
    async fn set_two_factor(&self, id: i64, enabled: bool, secret: Option<String>) -> Result<()> {
        self.set_two_factor_impl(id, enabled, secret).await
    }

    async fn touch_two_factor(&self, id: i64) -> Result<()> {
        self.touch_two_factor_impl(id).await
    }

    async fn get_two_factor_last_used(&self, id: i64) -> Result<Option<DateTime<Utc>>> {
        self.get_two_factor_last_used_impl(id).await
    }

    async fn replace_backup_codes(&self, user_id: i64, code_hashes: Vec<String>) -> Result<()> {
        self.replace_backup_codes_impl(user_id, code_hashes).await
    }

    async fn list_unused_backup_codes(&self, user_id: i64) -> Result<Vec<BackupCodeRecord>> {
        self.list_unused_backup_codes_impl(user_id).await
    }

    async fn consume_backup_code(&self, code_id: i64) -> Result<bool> {
        self.consume_backup_code_impl(code_id).await
    }

    async fn count_unused_backup_codes(&self, user_id: i64) -> Result<u64> {
        self.count_unused_backup_codes_impl(user_id).await
    }

    // 家长模块
    async fn link_child(&self, parent_id: i64, student_id: i64) -> Result<bool> {
        self.link_child_impl(parent_id, student_id).await
    }

    async fn unlink_child(&self, parent_id: i64, student_id: i64) -> Result<bool> {
        self.unlink_child_impl(parent_id, student_id).await
    }

    async fn list_children(&self, parent_id: i64) -> Result<Vec<User>> {
        self.list_children_impl(parent_id).await
    }

    async fn is_parent_of(&self, parent_id: i64, student_id: i64) -> Result<bool> {
        self.is_parent_of_impl(parent_id, student_id).await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>> {
        self.get_course_by_code_impl(code).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn list_all_courses(&self) -> Result<Vec<Course>> {
        self.list_all_courses_impl().await
    }

    async fn list_courses_by_teacher(&self, teacher_id: i64) -> Result<Vec<Course>> {
        self.list_courses_by_teacher_impl(teacher_id).await
    }

    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    async fn add_course_assignment(
        &self,
        id: i64,
        assignment: Assignment,
    ) -> Result<Option<Course>> {
        self.add_course_assignment_impl(id, assignment).await
    }

    async fn add_course_exam(&self, id: i64, exam: Exam) -> Result<Option<Course>> {
        self.add_course_exam_impl(id, exam).await
    }

    async fn enroll_student(&self, course_id: i64, student_id: i64) -> Result<bool> {
        self.enroll_student_impl(course_id, student_id).await
    }

    async fn unenroll_student(&self, course_id: i64, student_id: i64) -> Result<bool> {
        self.unenroll_student_impl(course_id, student_id).await
    }

    async fn list_course_students(&self, course_id: i64) -> Result<Vec<User>> {
        self.list_course_students_impl(course_id).await
    }

    async fn list_student_courses(&self, student_id: i64) -> Result<Vec<Course>> {
        self.list_student_courses_impl(student_id).await
    }

    async fn list_enrollments(&self) -> Result<Vec<(i64, i64)>> {
        self.list_enrollments_impl().await
    }

    async fn create_course_material(&self, material: NewCourseMaterial) -> Result<CourseMaterial> {
        self.create_course_material_impl(material).await
    }

    async fn get_course_material(&self, id: i64) -> Result<Option<CourseMaterial>> {
        self.get_course_material_impl(id).await
    }

    async fn list_course_materials(&self, course_id: i64) -> Result<Vec<CourseMaterial>> {
        self.list_course_materials_impl(course_id).await
    }

    async fn delete_course_material(&self, id: i64) -> Result<bool> {
        self.delete_course_material_impl(id).await
    }

    // 成绩模块
    async fn create_mark(&self, mark: NewMark) -> Result<Mark> {
        self.create_mark_impl(mark).await
    }

    async fn get_mark_by_id(&self, id: i64) -> Result<Option<Mark>> {
        self.get_mark_by_id_impl(id).await
    }

    async fn update_mark(&self, id: i64, update: UpdateMarkRequest) -> Result<Option<Mark>> {
        self.update_mark_impl(id, update).await
    }

    async fn delete_mark(&self, id: i64) -> Result<bool> {
        self.delete_mark_impl(id).await
    }

    async fn list_marks_by_student(&self, student_id: i64) -> Result<Vec<MarkView>> {
        self.list_marks_by_student_impl(student_id).await
    }

    async fn list_marks_by_course(&self, course_id: i64) -> Result<Vec<MarkView>> {
        self.list_marks_by_course_impl(course_id).await
    }

    async fn list_mark_views(&self, course_id: Option<i64>) -> Result<Vec<MarkView>> {
        self.list_mark_views_impl(course_id).await
    }

    async fn list_all_marks(&self) -> Result<Vec<Mark>> {
        self.list_all_marks_impl().await
    }

    // 考勤模块
    async fn upsert_attendance(&self, record: AttendanceUpsert) -> Result<(Attendance, bool)> {
        self.upsert_attendance_impl(record).await
    }

    async fn list_attendance_by_student(&self, student_id: i64) -> Result<Vec<Attendance>> {
        self.list_attendance_by_student_impl(student_id).await
    }

    async fn list_all_attendance(&self) -> Result<Vec<Attendance>> {
        self.list_all_attendance_impl().await
    }

    async fn list_attendance_since(&self, since: DateTime<Utc>) -> Result<Vec<Attendance>> {
        self.list_attendance_since_impl(since).await
    }

    async fn recompute_student_attendance(&self, student_id: i64) -> Result<f64> {
        self.recompute_student_attendance_impl(student_id).await
    }

    // 内部评估模块
    async fn upsert_internal_marks(
        &self,
        record: InternalMarksUpsert,
    ) -> Result<(InternalMarks, bool)> {
        self.upsert_internal_marks_impl(record).await
    }

    async fn get_internal_marks_by_id(&self, id: i64) -> Result<Option<InternalMarks>> {
        self.get_internal_marks_by_id_impl(id).await
    }

    async fn list_internal_marks_by_course(
        &self,
        course_id: i64,
    ) -> Result<Vec<InternalMarksView>> {
        self.list_internal_marks_by_course_impl(course_id).await
    }

    async fn list_internal_marks_by_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<InternalMarksView>> {
        self.list_internal_marks_by_student_impl(student_id).await
    }

    async fn delete_internal_marks(&self, id: i64) -> Result<bool> {
        self.delete_internal_marks_impl(id).await
    }

    // 公告模块
    async fn create_announcement(
        &self,
        teacher_id: i64,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement> {
        self.create_announcement_impl(teacher_id, req).await
    }

    async fn get_announcement_by_id(&self, id: i64) -> Result<Option<Announcement>> {
        self.get_announcement_by_id_impl(id).await
    }

    async fn list_announcements_with_pagination(
        &self,
        page: u64,
        size: u64,
    ) -> Result<AnnouncementListResponse> {
        self.list_announcements_with_pagination_impl(page, size)
            .await
    }

    async fn update_announcement(
        &self,
        id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>> {
        self.update_announcement_impl(id, update).await
    }

    async fn delete_announcement(&self, id: i64) -> Result<bool> {
        self.delete_announcement_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::entities::SubjectType;
    use crate::models::internal_marks::entities::CieComponents;
    use crate::models::users::entities::{
        Department, Designation, StudentProfile, TeacherProfile, UserKind,
    };

    async fn seed(storage: &SeaOrmStorage) -> (i64, i64, i64) {
        let teacher = storage
            .create_user(NewUser {
                name: "Ravi".into(),
                email: "ravi@college.edu".into(),
                password_hash: "x".into(),
                kind: UserKind::Teacher(TeacherProfile {
                    faculty_id: "FAC001".into(),
                    department: Department::Cse,
                    designation: Designation::Professor,
                    is_admin: false,
                }),
            })
            .await
            .unwrap();
        let student = storage
            .create_user(NewUser {
                name: "Asha".into(),
                email: "asha@college.edu".into(),
                password_hash: "x".into(),
                kind: UserKind::Student(StudentProfile {
                    usn: "1RV21CS001".into(),
                    branch: Department::Cse,
                    semester: 5,
                    cgpa: 8.5,
                    attendance_percentage: 0.0,
                    parent_id: None,
                }),
            })
            .await
            .unwrap();
        let course = storage
            .create_course(CreateCourseRequest {
                code: "cs501".into(),
                title: "Compilers".into(),
                description: None,
                credits: 4,
                department: Department::Cse,
                semester: 5,
                subject_type: Some(SubjectType::Theory),
                teacher_id: Some(teacher.id),
                schedule: Vec::new(),
            })
            .await
            .unwrap();
        (teacher.id, student.id, course.id)
    }

    #[actix_web::test]
    async fn test_internal_marks_upsert_keeps_one_row_per_student_course() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (teacher_id, student_id, course_id) = seed(&storage).await;

        let record = |test1: f64, cie: f64| InternalMarksUpsert {
            student_id,
            course_id,
            subject_type: SubjectType::Theory,
            components: CieComponents {
                test1: Some(test1),
                ..Default::default()
            },
            calculated_cie: cie,
            uploaded_by: teacher_id,
        };

        let (first, created) = storage.upsert_internal_marks(record(30.0, 20.0)).await.unwrap();
        assert!(created);
        let (second, created) = storage.upsert_internal_marks(record(40.0, 26.5)).await.unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(second.components.test1, Some(40.0));
        assert_eq!(second.calculated_cie, 26.5);

        let rows = storage.list_internal_marks_by_course(course_id).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[actix_web::test]
    async fn test_attendance_upsert_and_recompute() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (_, student_id, course_id) = seed(&storage).await;

        let record = |total, attended| AttendanceUpsert {
            student_id,
            course_id,
            subject_name: "Compilers".into(),
            total_classes: total,
            attended_classes: attended,
        };

        let (_, created) = storage.upsert_attendance(record(40, 30)).await.unwrap();
        assert!(created);
        let (saved, created) = storage.upsert_attendance(record(50, 45)).await.unwrap();
        assert!(!created);
        assert_eq!(saved.total_classes, 50);

        let rows = storage.list_attendance_by_student(student_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(storage.recompute_student_attendance(student_id).await.unwrap(), 90.0);

        let student = storage.get_user_by_id(student_id).await.unwrap().unwrap();
        assert_eq!(student.as_student().map(|p| p.attendance_percentage), Some(90.0));
    }

    #[actix_web::test]
    async fn test_recompute_handles_counts_near_i32_max() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (teacher_id, student_id, course_id) = seed(&storage).await;
        let second_course = storage
            .create_course(CreateCourseRequest {
                code: "cs502".into(),
                title: "Networks".into(),
                description: None,
                credits: 3,
                department: Department::Cse,
                semester: 5,
                subject_type: None,
                teacher_id: Some(teacher_id),
                schedule: Vec::new(),
            })
            .await
            .unwrap();

        for (course, name) in [(course_id, "Compilers"), (second_course.id, "Networks")] {
            storage
                .upsert_attendance(AttendanceUpsert {
                    student_id,
                    course_id: course,
                    subject_name: name.into(),
                    total_classes: 2_000_000_000,
                    attended_classes: 2_000_000_000,
                })
                .await
                .unwrap();
        }

        assert_eq!(storage.recompute_student_attendance(student_id).await.unwrap(), 100.0);
    }
}
