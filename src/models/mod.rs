pub mod analytics;
pub mod announcements;
pub mod auth;
pub mod common;
pub mod courses;
pub mod internal_marks;
pub mod marks;
pub mod parents;
pub mod profile;
pub mod students;
pub mod teachers;
pub mod two_factor;
pub mod users;

pub use common::{
    ApiResponse, ErrorCode, ImportRowError, ImportSummary, PaginatedResponse, PaginationInfo,
    PaginationQuery,
};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
