//! 用户实体（学生 / 家长 / 教师共用一张表）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub profile_picture_file: Option<String>,
    pub profile_picture_url: Option<String>,
    pub profile_picture_uploaded_at: Option<i64>,
    pub theme: String,
    pub notify_email: bool,
    pub notify_push: bool,
    pub notify_announcements: bool,
    pub profile_visibility: String,
    pub show_email: bool,
    pub two_factor_enabled: bool,
    pub two_factor_secret: Option<String>,
    pub two_factor_last_used_at: Option<i64>,
    pub login_attempts: i32,
    pub lock_until: Option<i64>,
    pub last_login_ip: Option<String>,
    pub last_login_at: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub trusted_devices: Option<String>,
    #[sea_orm(unique)]
    pub usn: Option<String>,
    pub branch: Option<String>,
    pub semester: Option<i32>,
    #[sea_orm(column_type = "Double", nullable)]
    pub cgpa: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub attendance_percentage: Option<f64>,
    pub parent_id: Option<i64>,
    pub child_usn: Option<String>,
    #[sea_orm(unique)]
    pub faculty_id: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub is_admin: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::courses::Entity")]
    Courses,
    #[sea_orm(has_many = "super::marks::Entity")]
    Marks,
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
    #[sea_orm(has_many = "super::course_enrollments::Entity")]
    CourseEnrollments,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courses.def()
    }
}

impl Related<super::marks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Marks.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl Related<super::course_enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseEnrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn to_datetime(ts: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::<chrono::Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_user(self) -> crate::models::users::entities::User {
        use crate::models::users::entities::{
            Department, Designation, NotificationPreferences, ParentProfile, Preferences,
            PrivacyPreferences, ProfilePicture, ProfileVisibility, SecurityInfo, StudentProfile,
            TeacherProfile, Theme, TrustedDevice, User, UserKind, UserRole,
        };

        let role = self.role.parse::<UserRole>().unwrap_or(UserRole::Student);
        let kind = match role {
            UserRole::Student => UserKind::Student(StudentProfile {
                usn: self.usn.unwrap_or_default(),
                branch: self
                    .branch
                    .as_deref()
                    .and_then(|b| b.parse().ok())
                    .unwrap_or(Department::Cse),
                semester: self.semester.unwrap_or(1),
                cgpa: self.cgpa.unwrap_or_default(),
                attendance_percentage: self.attendance_percentage.unwrap_or_default(),
                parent_id: self.parent_id,
            }),
            UserRole::Parent => UserKind::Parent(ParentProfile {
                child_usn: self.child_usn,
            }),
            UserRole::Teacher => UserKind::Teacher(TeacherProfile {
                faculty_id: self.faculty_id.unwrap_or_default(),
                department: self
                    .department
                    .as_deref()
                    .and_then(|d| d.parse().ok())
                    .unwrap_or(Department::Cse),
                designation: self
                    .designation
                    .as_deref()
                    .and_then(|d| d.parse().ok())
                    .unwrap_or(Designation::Lecturer),
                is_admin: self.is_admin,
            }),
        };

        let profile_picture = match (self.profile_picture_file, self.profile_picture_url) {
            (Some(filename), Some(url)) => Some(ProfilePicture {
                filename,
                url,
                uploaded_at: to_datetime(self.profile_picture_uploaded_at.unwrap_or(self.updated_at)),
            }),
            _ => None,
        };

        let trusted_devices: Vec<TrustedDevice> = self
            .trusted_devices
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();

        User {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            kind,
            profile_picture,
            preferences: Preferences {
                theme: self.theme.parse().unwrap_or(Theme::Light),
                notifications: NotificationPreferences {
                    email: self.notify_email,
                    push: self.notify_push,
                    announcements: self.notify_announcements,
                },
                privacy: PrivacyPreferences {
                    profile_visibility: self
                        .profile_visibility
                        .parse()
                        .unwrap_or(ProfileVisibility::Public),
                    show_email: self.show_email,
                },
            },
            two_factor_enabled: self.two_factor_enabled,
            two_factor_secret: self.two_factor_secret,
            security: SecurityInfo {
                login_attempts: self.login_attempts,
                lock_until: self.lock_until.map(to_datetime),
                last_login_ip: self.last_login_ip,
                last_login_at: self.last_login_at.map(to_datetime),
                trusted_devices,
            },
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{Department, UserKind, UserRole};

    fn row(role: &str) -> Model {
        Model {
            id: 1,
            name: "Ravi".into(),
            email: "ravi@college.edu".into(),
            password_hash: "hash".into(),
            role: role.into(),
            profile_picture_file: None,
            profile_picture_url: None,
            profile_picture_uploaded_at: None,
            theme: "dark".into(),
            notify_email: true,
            notify_push: false,
            notify_announcements: true,
            profile_visibility: "private".into(),
            show_email: false,
            two_factor_enabled: false,
            two_factor_secret: None,
            two_factor_last_used_at: None,
            login_attempts: 2,
            lock_until: None,
            last_login_ip: None,
            last_login_at: None,
            trusted_devices: Some(r#"[{"deviceId":"d1","addedAt":"2025-01-01T00:00:00Z","lastUsedAt":null,"ip":null}]"#.into()),
            usn: Some("1RV21CS002".into()),
            branch: Some("ISE".into()),
            semester: Some(3),
            cgpa: Some(7.9),
            attendance_percentage: Some(88.5),
            parent_id: None,
            child_usn: None,
            faculty_id: None,
            department: None,
            designation: None,
            is_admin: false,
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_student_row_maps_to_student_kind() {
        let user = row("student").into_user();
        assert_eq!(user.role(), UserRole::Student);
        match &user.kind {
            UserKind::Student(s) => {
                assert_eq!(s.usn, "1RV21CS002");
                assert_eq!(s.branch, Department::Ise);
                assert_eq!(s.semester, 3);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
        assert_eq!(user.security.login_attempts, 2);
        assert!(user.security.is_trusted_device("d1"));
        assert!(!user.preferences.notifications.push);
    }

    #[test]
    fn test_teacher_row_defaults_missing_profile_fields() {
        let mut teacher = row("teacher");
        teacher.faculty_id = Some("FAC9".into());
        teacher.is_admin = true;
        let user = teacher.into_user();
        assert!(user.is_admin());
        assert_eq!(user.as_teacher().map(|t| t.faculty_id.as_str()), Some("FAC9"));
    }
}
