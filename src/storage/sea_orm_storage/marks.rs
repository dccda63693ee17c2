//! 成绩存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::marks::{ActiveModel, Column, Entity as Marks, Model as MarkModel};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{CampusError, Result};
use crate::models::marks::{
    entities::{Mark, MarkView},
    requests::{NewMark, UpdateMarkRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_mark_impl(&self, mark: NewMark) -> Result<Mark> {
        let result = ActiveModel {
            student_id: Set(mark.student_id),
            course_id: Set(mark.course_id),
            subject_name: Set(mark.subject_name),
            score: Set(mark.score),
            grade: Set(mark.grade),
            uploaded_by: Set(Some(mark.uploaded_by)),
            uploaded_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("录入成绩失败: {e}")))?;

        Ok(result.into_mark())
    }

    pub async fn get_mark_by_id_impl(&self, id: i64) -> Result<Option<Mark>> {
        let result = Marks::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_mark()))
    }

    /// 修改成绩，调用方负责重新推导等级
    pub async fn update_mark_impl(&self, id: i64, update: UpdateMarkRequest) -> Result<Option<Mark>> {
        if self.get_mark_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(subject_name) = update.subject_name {
            model.subject_name = Set(subject_name);
        }
        if let Some(score) = update.score {
            model.score = Set(score);
        }
        if let Some(grade) = update.grade {
            model.grade = Set(grade);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("修改成绩失败: {e}")))?;

        self.get_mark_by_id_impl(id).await
    }

    pub async fn delete_mark_impl(&self, id: i64) -> Result<bool> {
        let result = Marks::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除成绩失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_marks_by_student_impl(&self, student_id: i64) -> Result<Vec<MarkView>> {
        let rows = Marks::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::UploadedAt)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学生成绩失败: {e}")))?;

        self.build_mark_views(rows).await
    }

    pub async fn list_marks_by_course_impl(&self, course_id: i64) -> Result<Vec<MarkView>> {
        let rows = Marks::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_desc(Column::UploadedAt)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程成绩失败: {e}")))?;

        self.build_mark_views(rows).await
    }

    pub async fn list_mark_views_impl(&self, course_id: Option<i64>) -> Result<Vec<MarkView>> {
        let mut select = Marks::find();
        if let Some(course_id) = course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }

        let rows = select
            .order_by_asc(Column::CourseId)
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询成绩失败: {e}")))?;

        self.build_mark_views(rows).await
    }

    pub async fn list_all_marks_impl(&self) -> Result<Vec<Mark>> {
        let rows = Marks::find()
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_mark()).collect())
    }

    /// 批量补齐课程与学生信息
    async fn build_mark_views(&self, rows: Vec<MarkModel>) -> Result<Vec<MarkView>> {
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
                MarkView {
                    course_code: course.map(|c| c.0.clone()),
                    course_title: course.map(|c| c.1.clone()),
                    student_name: student.map(|s| s.0.clone()),
                    usn: student.and_then(|s| s.1.clone()),
                    mark: m.into_mark(),
                }
            })
            .collect())
    }
}
