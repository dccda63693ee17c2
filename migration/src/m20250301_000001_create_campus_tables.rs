use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表（学生 / 家长 / 教师共用，按 role 区分）
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    // 头像
                    .col(ColumnDef::new(Users::ProfilePictureFile).string().null())
                    .col(ColumnDef::new(Users::ProfilePictureUrl).string().null())
                    .col(
                        ColumnDef::new(Users::ProfilePictureUploadedAt)
                            .big_integer()
                            .null(),
                    )
                    // 偏好设置
                    .col(
                        ColumnDef::new(Users::Theme)
                            .string()
                            .not_null()
                            .default("light"),
                    )
                    .col(
                        ColumnDef::new(Users::NotifyEmail)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::NotifyPush)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::NotifyAnnouncements)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::ProfileVisibility)
                            .string()
                            .not_null()
                            .default("public"),
                    )
                    .col(
                        ColumnDef::new(Users::ShowEmail)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    // 两步验证
                    .col(
                        ColumnDef::new(Users::TwoFactorEnabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Users::TwoFactorSecret).string().null())
                    .col(
                        ColumnDef::new(Users::TwoFactorLastUsedAt)
                            .big_integer()
                            .null(),
                    )
                    // 安全信息
                    .col(
                        ColumnDef::new(Users::LoginAttempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Users::LockUntil).big_integer().null())
                    .col(ColumnDef::new(Users::LastLoginIp).string().null())
                    .col(ColumnDef::new(Users::LastLoginAt).big_integer().null())
                    .col(ColumnDef::new(Users::TrustedDevices).text().null())
                    // 学生字段
                    .col(ColumnDef::new(Users::Usn).string().null().unique_key())
                    .col(ColumnDef::new(Users::Branch).string().null())
                    .col(ColumnDef::new(Users::Semester).integer().null())
                    .col(ColumnDef::new(Users::Cgpa).double().null())
                    .col(ColumnDef::new(Users::AttendancePercentage).double().null())
                    .col(ColumnDef::new(Users::ParentId).big_integer().null())
                    // 家长字段
                    .col(ColumnDef::new(Users::ChildUsn).string().null())
                    // 教师字段
                    .col(
                        ColumnDef::new(Users::FacultyId)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Department).string().null())
                    .col(ColumnDef::new(Users::Designation).string().null())
                    .col(
                        ColumnDef::new(Users::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Users::Table, Users::ParentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 家长-子女关联表
        manager
            .create_table(
                Table::create()
                    .table(ParentChildren::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParentChildren::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ParentChildren::ParentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParentChildren::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParentChildren::LinkedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ParentChildren::Table, ParentChildren::ParentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ParentChildren::Table, ParentChildren::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 课程表
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Courses::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Description).text().null())
                    .col(ColumnDef::new(Courses::Credits).integer().not_null())
                    .col(ColumnDef::new(Courses::Department).string().not_null())
                    .col(ColumnDef::new(Courses::Semester).integer().not_null())
                    .col(
                        ColumnDef::new(Courses::SubjectType)
                            .string()
                            .not_null()
                            .default("theory"),
                    )
                    .col(ColumnDef::new(Courses::TeacherId).big_integer().null())
                    .col(ColumnDef::new(Courses::Schedule).text().null())
                    .col(ColumnDef::new(Courses::Assignments).text().null())
                    .col(ColumnDef::new(Courses::Exams).text().null())
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 选课表
        manager
            .create_table(
                Table::create()
                    .table(CourseEnrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseEnrollments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CourseEnrollments::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseEnrollments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseEnrollments::EnrolledAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseEnrollments::Table, CourseEnrollments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseEnrollments::Table, CourseEnrollments::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 课程资料表
        manager
            .create_table(
                Table::create()
                    .table(CourseMaterials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseMaterials::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CourseMaterials::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CourseMaterials::Title).string().not_null())
                    .col(
                        ColumnDef::new(CourseMaterials::OriginalName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseMaterials::StoredName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CourseMaterials::Url).string().not_null())
                    .col(
                        ColumnDef::new(CourseMaterials::FileSize)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseMaterials::UploadedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CourseMaterials::UploadedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseMaterials::Table, CourseMaterials::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 成绩表（不做唯一约束，重复上传会产生多条记录）
        manager
            .create_table(
                Table::create()
                    .table(Marks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Marks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Marks::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Marks::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Marks::SubjectName).string().not_null())
                    .col(ColumnDef::new(Marks::Score).double().not_null())
                    .col(ColumnDef::new(Marks::Grade).string().not_null())
                    .col(ColumnDef::new(Marks::UploadedBy).big_integer().null())
                    .col(ColumnDef::new(Marks::UploadedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Marks::Table, Marks::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Marks::Table, Marks::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Marks::Table, Marks::UploadedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 考勤表
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Attendance::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Attendance::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Attendance::SubjectName).string().not_null())
                    .col(
                        ColumnDef::new(Attendance::TotalClasses)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Attendance::AttendedClasses)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Attendance::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Attendance::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendance::Table, Attendance::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendance::Table, Attendance::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 内部评估成绩表
        manager
            .create_table(
                Table::create()
                    .table(InternalMarks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InternalMarks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InternalMarks::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InternalMarks::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InternalMarks::SubjectType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InternalMarks::Test1).double().null())
                    .col(ColumnDef::new(InternalMarks::Test2).double().null())
                    .col(ColumnDef::new(InternalMarks::Assignment1).double().null())
                    .col(ColumnDef::new(InternalMarks::Seminar2).double().null())
                    .col(ColumnDef::new(InternalMarks::TheoryTest1).double().null())
                    .col(ColumnDef::new(InternalMarks::TheoryTest2).double().null())
                    .col(
                        ColumnDef::new(InternalMarks::TheoryAssignment1)
                            .double()
                            .null(),
                    )
                    .col(ColumnDef::new(InternalMarks::TheorySeminar).double().null())
                    .col(ColumnDef::new(InternalMarks::Conduction).double().null())
                    .col(ColumnDef::new(InternalMarks::Record).double().null())
                    .col(ColumnDef::new(InternalMarks::LabTest).double().null())
                    .col(
                        ColumnDef::new(InternalMarks::ConductionViva)
                            .double()
                            .null(),
                    )
                    .col(ColumnDef::new(InternalMarks::RecordJournal).double().null())
                    .col(ColumnDef::new(InternalMarks::LabTestOnly).double().null())
                    .col(
                        ColumnDef::new(InternalMarks::CalculatedCie)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(InternalMarks::UploadedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(InternalMarks::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InternalMarks::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(InternalMarks::Table, InternalMarks::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(InternalMarks::Table, InternalMarks::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 公告表
        manager
            .create_table(
                Table::create()
                    .table(Announcements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Announcements::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Announcements::Title).string().not_null())
                    .col(ColumnDef::new(Announcements::Content).text().not_null())
                    .col(ColumnDef::new(Announcements::Date).big_integer().not_null())
                    .col(
                        ColumnDef::new(Announcements::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Announcements::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Announcements::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Announcements::Table, Announcements::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        // 用户表索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_branch_semester")
                    .table(Users::Table)
                    .col(Users::Branch)
                    .col(Users::Semester)
                    .to_owned(),
            )
            .await?;

        // 唯一约束：家长-子女
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_parent_children_parent_student")
                    .table(ParentChildren::Table)
                    .col(ParentChildren::ParentId)
                    .col(ParentChildren::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 唯一约束：选课
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_course_enrollments_course_student")
                    .table(CourseEnrollments::Table)
                    .col(CourseEnrollments::CourseId)
                    .col(CourseEnrollments::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 课程表索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_courses_teacher_id")
                    .table(Courses::Table)
                    .col(Courses::TeacherId)
                    .to_owned(),
            )
            .await?;

        // 成绩表索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_marks_student_course")
                    .table(Marks::Table)
                    .col(Marks::StudentId)
                    .col(Marks::CourseId)
                    .to_owned(),
            )
            .await?;

        // 唯一约束：考勤 upsert 目标
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_attendance_student_course_subject")
                    .table(Attendance::Table)
                    .col(Attendance::StudentId)
                    .col(Attendance::CourseId)
                    .col(Attendance::SubjectName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendance_created_at")
                    .table(Attendance::Table)
                    .col(Attendance::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 唯一约束：内部评估 upsert 目标
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_internal_marks_student_course")
                    .table(InternalMarks::Table)
                    .col(InternalMarks::StudentId)
                    .col(InternalMarks::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_announcements_date")
                    .table(Announcements::Table)
                    .col(Announcements::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按依赖关系逆序删除
        manager
            .drop_table(Table::drop().table(Announcements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InternalMarks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Marks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseMaterials::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseEnrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ParentChildren::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    ProfilePictureFile,
    ProfilePictureUrl,
    ProfilePictureUploadedAt,
    Theme,
    NotifyEmail,
    NotifyPush,
    NotifyAnnouncements,
    ProfileVisibility,
    ShowEmail,
    TwoFactorEnabled,
    TwoFactorSecret,
    TwoFactorLastUsedAt,
    LoginAttempts,
    LockUntil,
    LastLoginIp,
    LastLoginAt,
    TrustedDevices,
    Usn,
    Branch,
    Semester,
    Cgpa,
    AttendancePercentage,
    ParentId,
    ChildUsn,
    FacultyId,
    Department,
    Designation,
    IsAdmin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ParentChildren {
    #[sea_orm(iden = "parent_children")]
    Table,
    Id,
    ParentId,
    StudentId,
    LinkedAt,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    Code,
    Title,
    Description,
    Credits,
    Department,
    Semester,
    SubjectType,
    TeacherId,
    Schedule,
    Assignments,
    Exams,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CourseEnrollments {
    #[sea_orm(iden = "course_enrollments")]
    Table,
    Id,
    CourseId,
    StudentId,
    EnrolledAt,
}

#[derive(DeriveIden)]
enum CourseMaterials {
    #[sea_orm(iden = "course_materials")]
    Table,
    Id,
    CourseId,
    Title,
    OriginalName,
    StoredName,
    Url,
    FileSize,
    UploadedBy,
    UploadedAt,
}

#[derive(DeriveIden)]
enum Marks {
    #[sea_orm(iden = "marks")]
    Table,
    Id,
    StudentId,
    CourseId,
    SubjectName,
    Score,
    Grade,
    UploadedBy,
    UploadedAt,
}

#[derive(DeriveIden)]
enum Attendance {
    #[sea_orm(iden = "attendance")]
    Table,
    Id,
    StudentId,
    CourseId,
    SubjectName,
    TotalClasses,
    AttendedClasses,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InternalMarks {
    #[sea_orm(iden = "internal_marks")]
    Table,
    Id,
    StudentId,
    CourseId,
    SubjectType,
    Test1,
    Test2,
    Assignment1,
    Seminar2,
    TheoryTest1,
    TheoryTest2,
    TheoryAssignment1,
    TheorySeminar,
    Conduction,
    Record,
    LabTest,
    ConductionViva,
    RecordJournal,
    LabTestOnly,
    CalculatedCie,
    UploadedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Announcements {
    #[sea_orm(iden = "announcements")]
    Table,
    Id,
    Title,
    Content,
    Date,
    TeacherId,
    CreatedAt,
    UpdatedAt,
}
