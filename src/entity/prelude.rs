//! 预导入模块，方便使用

pub use super::announcements::{
    ActiveModel as AnnouncementActiveModel, Entity as Announcements, Model as AnnouncementModel,
};
pub use super::attendance::{
    ActiveModel as AttendanceActiveModel, Entity as AttendanceRecords, Model as AttendanceModel,
};
pub use super::course_enrollments::{
    ActiveModel as CourseEnrollmentActiveModel, Entity as CourseEnrollments,
    Model as CourseEnrollmentModel,
};
pub use super::course_materials::{
    ActiveModel as CourseMaterialActiveModel, Entity as CourseMaterials,
    Model as CourseMaterialModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::internal_marks::{
    ActiveModel as InternalMarksActiveModel, Entity as InternalMarksRecords,
    Model as InternalMarksModel,
};
pub use super::marks::{ActiveModel as MarkActiveModel, Entity as Marks, Model as MarkModel};
pub use super::parent_children::{
    ActiveModel as ParentChildActiveModel, Entity as ParentChildren, Model as ParentChildModel,
};
pub use super::two_factor_backup_codes::{
    ActiveModel as BackupCodeActiveModel, Entity as BackupCodes, Model as BackupCodeModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
