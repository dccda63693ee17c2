pub mod access;
pub mod analytics;
pub mod announcements;
pub mod auth;
pub mod courses;
pub mod files;
pub mod internal_marks;
pub mod marks;
pub mod parents;
pub mod profile;
pub mod student_portal;
pub mod students;
pub mod teachers;
pub mod two_factor;

pub use analytics::AnalyticsService;
pub use announcements::AnnouncementService;
pub use auth::AuthService;
pub use courses::CourseService;
pub use files::FileService;
pub use internal_marks::InternalMarksService;
pub use marks::MarkService;
pub use parents::ParentService;
pub use profile::ProfileService;
pub use student_portal::StudentPortalService;
pub use students::StudentService;
pub use teachers::TeacherService;
pub use two_factor::TwoFactorService;
