//! 考勤存储操作

use super::SeaOrmStorage;
use crate::entity::attendance::{ActiveModel, Column, Entity as AttendanceRecords};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{CampusError, Result};
use crate::models::marks::{entities::Attendance, requests::AttendanceUpsert};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 按 (学生, 课程, 科目) upsert，返回记录及是否为新建
    pub async fn upsert_attendance_impl(
        &self,
        record: AttendanceUpsert,
    ) -> Result<(Attendance, bool)> {
        let now = Utc::now().timestamp();

        let existing = self
            .find_attendance(record.student_id, record.course_id, &record.subject_name)
            .await?;
        let created = existing.is_none();

        let model = ActiveModel {
            student_id: Set(record.student_id),
            course_id: Set(record.course_id),
            subject_name: Set(record.subject_name.clone()),
            total_classes: Set(record.total_classes),
            attended_classes: Set(record.attended_classes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        AttendanceRecords::insert(model)
            .on_conflict(
                OnConflict::columns([Column::StudentId, Column::CourseId, Column::SubjectName])
                    .update_columns([
                        Column::TotalClasses,
                        Column::AttendedClasses,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("保存考勤失败: {e}")))?;

        let saved = self
            .find_attendance(record.student_id, record.course_id, &record.subject_name)
            .await?
            .ok_or_else(|| CampusError::database_operation("考勤记录写入后未找到"))?;

        Ok((saved, created))
    }

    async fn find_attendance(
        &self,
        student_id: i64,
        course_id: i64,
        subject_name: &str,
    ) -> Result<Option<Attendance>> {
        let result = AttendanceRecords::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::SubjectName.eq(subject_name))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(result.map(|m| m.into_attendance()))
    }

    pub async fn list_attendance_by_student_impl(&self, student_id: i64) -> Result<Vec<Attendance>> {
        let rows = AttendanceRecords::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::SubjectName)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_attendance()).collect())
    }

    pub async fn list_all_attendance_impl(&self) -> Result<Vec<Attendance>> {
        let rows = AttendanceRecords::find()
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_attendance()).collect())
    }

    pub async fn list_attendance_since_impl(&self, since: DateTime<Utc>) -> Result<Vec<Attendance>> {
        let rows = AttendanceRecords::find()
            .filter(Column::CreatedAt.gte(since.timestamp()))
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_attendance()).collect())
    }

    /// 以全部考勤记录的出勤总数 / 课时总数重算学生出勤率
    pub async fn recompute_student_attendance_impl(&self, student_id: i64) -> Result<f64> {
        let records = self.list_attendance_by_student_impl(student_id).await?;
        let percentage = Attendance::overall_percentage(&records);

        Users::update_many()
            .col_expr(UserColumn::AttendancePercentage, Expr::value(percentage))
            .col_expr(UserColumn::UpdatedAt, Expr::value(Utc::now().timestamp()))
            .filter(UserColumn::Id.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新学生出勤率失败: {e}")))?;

        Ok(percentage)
    }
}
