use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "user.ts")]
pub enum UserRole {
    Student, // 学生
    Parent,  // 家长
    Teacher, // 教师
}

impl UserRole {
    pub const STUDENT: &'static str = "student";
    pub const PARENT: &'static str = "parent";
    pub const TEACHER: &'static str = "teacher";

    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Student, &Self::Parent, &Self::Teacher]
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid role '{s}'. Supported roles: student, parent, teacher"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::Parent => write!(f, "{}", UserRole::PARENT),
            UserRole::Teacher => write!(f, "{}", UserRole::TEACHER),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::PARENT => Ok(UserRole::Parent),
            UserRole::TEACHER => Ok(UserRole::Teacher),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

/// 定义以字符串存储的枚举（序列化、Display、FromStr 共用同一组标签）
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $label:literal),* $(,)? }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
        $(#[$meta])*
        pub enum $name {
            $(#[serde(rename = $label)] $variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $name::ALL
                    .iter()
                    .find(|v| v.as_str().eq_ignore_ascii_case(trimmed))
                    .copied()
                    .ok_or_else(|| {
                        let allowed: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        format!(
                            "Invalid {} '{}'. Allowed: {}",
                            stringify!($name),
                            trimmed,
                            allowed.join(", ")
                        )
                    })
            }
        }
    };
}

pub(crate) use string_enum;

string_enum! {
    /// 院系
    #[ts(export, export_to = "user.ts")]
    pub enum Department {
        Cse => "CSE",
        Ise => "ISE",
        Ece => "ECE",
        Eee => "EEE",
        Me => "ME",
        Cv => "CV",
        Aiml => "AIML",
        Ds => "DS",
    }
}

string_enum! {
    /// 教师职称
    #[ts(export, export_to = "user.ts")]
    pub enum Designation {
        Professor => "Professor",
        AssociateProfessor => "Associate Professor",
        AssistantProfessor => "Assistant Professor",
        Lecturer => "Lecturer",
        LabInstructor => "Lab Instructor",
    }
}

string_enum! {
    #[ts(export, export_to = "user.ts")]
    pub enum Theme {
        Light => "light",
        Dark => "dark",
        System => "system",
    }
}

string_enum! {
    #[ts(export, export_to = "user.ts")]
    pub enum ProfileVisibility {
        Public => "public",
        Private => "private",
    }
}

// 头像信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "user.ts")]
pub struct ProfilePicture {
    pub filename: String,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "user.ts")]
pub struct NotificationPreferences {
    pub email: bool,
    pub push: bool,
    pub announcements: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            announcements: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "user.ts")]
pub struct PrivacyPreferences {
    pub profile_visibility: ProfileVisibility,
    pub show_email: bool,
}

impl Default for PrivacyPreferences {
    fn default() -> Self {
        Self {
            profile_visibility: ProfileVisibility::Public,
            show_email: false,
        }
    }
}

// 用户偏好设置
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "user.ts")]
pub struct Preferences {
    pub theme: Theme,
    pub notifications: NotificationPreferences,
    pub privacy: PrivacyPreferences,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            notifications: NotificationPreferences::default(),
            privacy: PrivacyPreferences::default(),
        }
    }
}

// 受信任设备
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "user.ts")]
pub struct TrustedDevice {
    pub device_id: String,
    pub added_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub ip: Option<String>,
}

// 登录安全信息
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "user.ts")]
pub struct SecurityInfo {
    pub login_attempts: i32,
    pub lock_until: Option<DateTime<Utc>>,
    pub last_login_ip: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub trusted_devices: Vec<TrustedDevice>,
}

impl SecurityInfo {
    /// 账号当前是否处于锁定状态
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.lock_until.is_some_and(|until| until > now)
    }

    /// 锁定已过期（需要重置计数）
    pub fn lock_expired(&self, now: DateTime<Utc>) -> bool {
        self.lock_until.is_some_and(|until| until <= now)
    }

    pub fn is_trusted_device(&self, device_id: &str) -> bool {
        self.trusted_devices.iter().any(|d| d.device_id == device_id)
    }
}

// 学生档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "user.ts")]
pub struct StudentProfile {
    pub usn: String,
    pub branch: Department,
    pub semester: i32,
    pub cgpa: f64,
    pub attendance_percentage: f64,
    pub parent_id: Option<i64>,
}

// 家长档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "user.ts")]
pub struct ParentProfile {
    pub child_usn: Option<String>,
}

// 教师档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "user.ts")]
pub struct TeacherProfile {
    pub faculty_id: String,
    pub department: Department,
    pub designation: Designation,
    pub is_admin: bool,
}

/// 按角色区分的档案，序列化时以 `role` 字段为标签
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "role", rename_all = "lowercase")]
#[ts(export, export_to = "user.ts")]
pub enum UserKind {
    Student(StudentProfile),
    Parent(ParentProfile),
    Teacher(TeacherProfile),
}

impl UserKind {
    pub fn role(&self) -> UserRole {
        match self {
            UserKind::Student(_) => UserRole::Student,
            UserKind::Parent(_) => UserRole::Parent,
            UserKind::Teacher(_) => UserRole::Teacher,
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "user.ts")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    #[serde(flatten)]
    pub kind: UserKind,
    pub profile_picture: Option<ProfilePicture>,
    pub preferences: Preferences,
    pub two_factor_enabled: bool,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub two_factor_secret: Option<String>,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub security: SecurityInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> UserRole {
        self.kind.role()
    }

    pub fn as_student(&self) -> Option<&StudentProfile> {
        match &self.kind {
            UserKind::Student(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_teacher(&self) -> Option<&TeacherProfile> {
        match &self.kind {
            UserKind::Teacher(p) => Some(p),
            _ => None,
        }
    }

    /// 管理员即 is_admin 的教师
    pub fn is_admin(&self) -> bool {
        self.as_teacher().is_some_and(|t| t.is_admin)
    }

    pub fn is_teacher(&self) -> bool {
        self.role() == UserRole::Teacher
    }

    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            &self.role().to_string(),
            refresh_token_expiry,
        )
        .map_err(|e| format!("Failed to generate token pair: {e}"))
    }
}

#[cfg(test)]
impl User {
    pub(crate) fn fixture(id: i64, kind: UserKind) -> Self {
        User {
            id,
            name: format!("User {id}"),
            email: format!("user{id}@college.edu"),
            password_hash: String::new(),
            kind,
            profile_picture: None,
            preferences: Preferences::default(),
            two_factor_enabled: false,
            two_factor_secret: None,
            security: SecurityInfo::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub(crate) fn student_fixture(id: i64, usn: &str, branch: Department, semester: i32) -> Self {
        Self::fixture(
            id,
            UserKind::Student(StudentProfile {
                usn: usn.to_string(),
                branch,
                semester,
                cgpa: 0.0,
                attendance_percentage: 0.0,
                parent_id: None,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_student() -> User {
        let mut user = User::student_fixture(7, "1RV21CS001", Department::Cse, 5);
        user.name = "Asha".into();
        user.email = "asha@college.edu".into();
        user.password_hash = "secret-hash".into();
        user.two_factor_secret = Some("SECRET".into());
        if let UserKind::Student(p) = &mut user.kind {
            p.cgpa = 8.4;
            p.attendance_percentage = 82.0;
        }
        user
    }

    #[test]
    fn test_user_kind_is_flattened_with_role_tag() {
        let json = serde_json::to_value(sample_student()).unwrap();
        assert_eq!(json["role"], "student");
        assert_eq!(json["usn"], "1RV21CS001");
        assert_eq!(json["branch"], "CSE");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("twoFactorSecret").is_none());
    }

    #[test]
    fn test_user_round_trips_through_cache_json() {
        let json = serde_json::to_string(&sample_student()).unwrap();
        let user: User = serde_json::from_str(&json).unwrap();
        assert_eq!(user.role(), UserRole::Student);
        assert!(user.password_hash.is_empty());
        assert_eq!(user.as_student().map(|s| s.semester), Some(5));
    }

    #[test]
    fn test_string_enums_parse_case_insensitively() {
        assert_eq!("aiml".parse::<Department>(), Ok(Department::Aiml));
        assert_eq!(
            "Associate Professor".parse::<Designation>(),
            Ok(Designation::AssociateProfessor)
        );
        assert!("MBA".parse::<Department>().is_err());
        assert_eq!(Designation::LabInstructor.to_string(), "Lab Instructor");
    }

    #[test]
    fn test_lock_state() {
        let now = Utc::now();
        let mut security = SecurityInfo::default();
        assert!(!security.is_locked(now));

        security.lock_until = Some(now + chrono::Duration::minutes(10));
        assert!(security.is_locked(now));
        assert!(!security.lock_expired(now));

        security.lock_until = Some(now - chrono::Duration::minutes(1));
        assert!(!security.is_locked(now));
        assert!(security.lock_expired(now));
    }

    #[test]
    fn test_admin_requires_teacher_flag() {
        let student = sample_student();
        assert!(!student.is_admin());

        let mut teacher = sample_student();
        teacher.kind = UserKind::Teacher(TeacherProfile {
            faculty_id: "FAC001".into(),
            department: Department::Ise,
            designation: Designation::Professor,
            is_admin: true,
        });
        assert!(teacher.is_admin());
        assert!(teacher.is_teacher());
    }
}
