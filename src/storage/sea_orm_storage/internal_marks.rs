//! CIE 成绩存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::internal_marks::{
    ActiveModel, Column, Entity as InternalMarksRecords, Model as InternalMarksModel,
};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{CampusError, Result};
use crate::models::internal_marks::{
    entities::{InternalMarks, InternalMarksView},
    requests::InternalMarksUpsert,
};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 按 (学生, 课程) upsert
    pub async fn upsert_internal_marks_impl(
        &self,
        record: InternalMarksUpsert,
    ) -> Result<(InternalMarks, bool)> {
        let now = chrono::Utc::now().timestamp();
        let created = self
            .find_internal_marks(record.student_id, record.course_id)
            .await?
            .is_none();

        let c = record.components;
        let model = ActiveModel {
            student_id: Set(record.student_id),
            course_id: Set(record.course_id),
            subject_type: Set(record.subject_type.to_string()),
            test1: Set(c.test1),
            test2: Set(c.test2),
            assignment1: Set(c.assignment1),
            seminar2: Set(c.seminar2),
            theory_test1: Set(c.theory_test1),
            theory_test2: Set(c.theory_test2),
            theory_assignment1: Set(c.theory_assignment1),
            theory_seminar: Set(c.theory_seminar),
            conduction: Set(c.conduction),
            record: Set(c.record),
            lab_test: Set(c.lab_test),
            conduction_viva: Set(c.conduction_viva),
            record_journal: Set(c.record_journal),
            lab_test_only: Set(c.lab_test_only),
            calculated_cie: Set(record.calculated_cie),
            uploaded_by: Set(Some(record.uploaded_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        InternalMarksRecords::insert(model)
            .on_conflict(
                OnConflict::columns([Column::StudentId, Column::CourseId])
                    .update_columns([
                        Column::SubjectType,
                        Column::Test1,
                        Column::Test2,
                        Column::Assignment1,
                        Column::Seminar2,
                        Column::TheoryTest1,
                        Column::TheoryTest2,
                        Column::TheoryAssignment1,
                        Column::TheorySeminar,
                        Column::Conduction,
                        Column::Record,
                        Column::LabTest,
                        Column::ConductionViva,
                        Column::RecordJournal,
                        Column::LabTestOnly,
                        Column::CalculatedCie,
                        Column::UploadedBy,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("保存 CIE 成绩失败: {e}")))?;

        let saved = self
            .find_internal_marks(record.student_id, record.course_id)
            .await?
            .ok_or_else(|| CampusError::database_operation("CIE 成绩写入后未找到"))?;

        Ok((saved.into_internal_marks(), created))
    }

    async fn find_internal_marks(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<InternalMarksModel>> {
        InternalMarksRecords::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询 CIE 成绩失败: {e}")))
    }

    pub async fn get_internal_marks_by_id_impl(&self, id: i64) -> Result<Option<InternalMarks>> {
        let result = InternalMarksRecords::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询 CIE 成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_internal_marks()))
    }

    pub async fn list_internal_marks_by_course_impl(
        &self,
        course_id: i64,
    ) -> Result<Vec<InternalMarksView>> {
        let rows = InternalMarksRecords::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询 CIE 成绩失败: {e}")))?;

        let mut views = self.build_internal_marks_views(rows).await?;
        views.sort_by(|a, b| a.usn.cmp(&b.usn));
        Ok(views)
    }

    pub async fn list_internal_marks_by_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<InternalMarksView>> {
        let rows = InternalMarksRecords::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::CourseId)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询 CIE 成绩失败: {e}")))?;

        self.build_internal_marks_views(rows).await
    }

    pub async fn delete_internal_marks_impl(&self, id: i64) -> Result<bool> {
        let result = InternalMarksRecords::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除 CIE 成绩失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    async fn build_internal_marks_views(
        &self,
        rows: Vec<InternalMarksModel>,
    ) -> Result<Vec<InternalMarksView>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let course_ids: Vec<i64> = rows.iter().map(|m| m.course_id).collect();
        let student_ids: Vec<i64> = rows.iter().map(|m| m.student_id).collect();

        let courses: HashMap<i64, (String, String)> = Courses::find()
            .filter(CourseColumn::Id.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, (c.code, c.title)))
            .collect();

        let students: HashMap<i64, (String, Option<String>)> = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学生失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, (u.name, u.usn)))
            .collect();

        Ok(rows
            .into_iter()
            .map(|m| {
                let course = courses.get(&m.course_id);
                let student = students.get(&m.student_id);
                InternalMarksView {
                    student_name: student.map(|s| s.0.clone()),
                    usn: student.and_then(|s| s.1.clone()),
                    course_code: course.map(|c| c.0.clone()),
                    course_title: course.map(|c| c.1.clone()),
                    record: m.into_internal_marks(),
                }
            })
            .collect())
    }
}
