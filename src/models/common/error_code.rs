use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 业务错误码
///
/// 0 表示成功，其余按千位分组：
/// 1xxx 通用，2xxx 认证，3xxx 用户，4xxx 课程，5xxx 成绩/考勤，6xxx 文件与导入。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1004,
    Forbidden = 1003,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证
    Unauthorized = 2000,
    AuthFailed = 2001,
    AccountLocked = 2002,
    TwoFactorInvalid = 2003,
    TwoFactorNotEnabled = 2004,
    TwoFactorAlreadyEnabled = 2005,
    RegisterFailed = 2006,

    // 用户
    UserNotFound = 3000,
    UserEmailInvalid = 3001,
    UserEmailAlreadyExists = 3002,
    UserPasswordInvalid = 3003,
    UserUpdateFailed = 3004,
    StudentNotFound = 3010,
    StudentUsnAlreadyExists = 3011,
    ParentNotFound = 3020,
    ChildNotLinked = 3021,
    ChildAlreadyLinked = 3022,
    TeacherNotFound = 3030,
    TeacherFacultyIdAlreadyExists = 3031,

    // 课程
    CourseNotFound = 4000,
    CourseCodeAlreadyExists = 4001,
    CoursePermissionDenied = 4002,
    AlreadyEnrolled = 4003,
    NotEnrolled = 4004,
    MaterialNotFound = 4005,
    AnnouncementNotFound = 4010,

    // 成绩/考勤
    MarkNotFound = 5000,
    AttendanceInvalid = 5001,
    InternalMarksNotFound = 5002,
    InternalMarksOutOfRange = 5003,

    // 文件与导入
    FileNotFound = 6000,
    FileUploadFailed = 6001,
    FileTypeNotAllowed = 6002,
    FileSizeExceeded = 6003,
    ImportFileParseFailed = 6010,
    ImportFileMissingColumn = 6011,
    ImportFileDataInvalid = 6012,
    ExportFailed = 6020,
}

impl ErrorCode {
    pub fn is_success(self) -> bool {
        self == ErrorCode::Success
    }
}
