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

pub use analytics::configure_analytics_routes;
pub use announcements::configure_announcement_routes;
pub use auth::configure_auth_routes;
pub use courses::configure_course_routes;
pub use files::configure_file_routes;
pub use internal_marks::configure_internal_marks_routes;
pub use marks::configure_mark_routes;
pub use parents::configure_parent_routes;
pub use profile::configure_profile_routes;
pub use student_portal::configure_student_portal_routes;
pub use students::configure_student_routes;
pub use teachers::configure_teacher_routes;
pub use two_factor::configure_two_factor_routes;
