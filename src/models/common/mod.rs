pub mod error_code;
pub mod import;
pub mod pagination;
pub mod response;

pub use error_code::ErrorCode;
pub use import::{ImportRowError, ImportSummary};
pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use response::ApiResponse;
