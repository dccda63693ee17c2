//! 课程、选课与课程资料存储操作

use super::SeaOrmStorage;
use crate::entity::course_enrollments::{
    ActiveModel as EnrollmentActiveModel, Column as EnrollmentColumn, Entity as CourseEnrollments,
};
use crate::entity::course_materials::{
    ActiveModel as MaterialActiveModel, Column as MaterialColumn, Entity as CourseMaterials,
};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginationInfo,
    courses::{
        entities::{Assignment, Course, CourseMaterial, Exam, SubjectType},
        requests::{CourseListQuery, CreateCourseRequest, NewCourseMaterial, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    users::entities::User,
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            code: Set(req.code.trim().to_uppercase()),
            title: Set(req.title),
            description: Set(req.description),
            credits: Set(req.credits),
            department: Set(req.department.to_string()),
            semester: Set(req.semester),
            subject_type: Set(req.subject_type.unwrap_or(SubjectType::Theory).to_string()),
            teacher_id: Set(req.teacher_id),
            schedule: Set(Some(serde_json::to_string(&req.schedule)?)),
            assignments: Set(Some("[]".to_string())),
            exams: Set(Some("[]".to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_course())
    }

    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn get_course_by_code_impl(&self, code: &str) -> Result<Option<Course>> {
        let result = Courses::find()
            .filter(Column::Code.eq(code.trim().to_uppercase()))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Courses::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Code.contains(&escaped))
                    .add(Column::Title.contains(&escaped)),
            );
        }

        if let Some(department) = query.department {
            select = select.filter(Column::Department.eq(department.to_string()));
        }

        if let Some(semester) = query.semester {
            select = select.filter(Column::Semester.eq(semester));
        }

        select = select.order_by_asc(Column::Code);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程总数失败: {e}")))?;

        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn list_all_courses_impl(&self) -> Result<Vec<Course>> {
        let courses = Courses::find()
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }

    pub async fn list_courses_by_teacher_impl(&self, teacher_id: i64) -> Result<Vec<Course>> {
        let courses = Courses::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询教师课程失败: {e}")))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }

    /// 更新课程
    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(code) = update.code {
            model.code = Set(code.trim().to_uppercase());
        }
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(credits) = update.credits {
            model.credits = Set(credits);
        }
        if let Some(department) = update.department {
            model.department = Set(department.to_string());
        }
        if let Some(semester) = update.semester {
            model.semester = Set(semester);
        }
        if let Some(subject_type) = update.subject_type {
            model.subject_type = Set(subject_type.to_string());
        }
        if let Some(teacher_id) = update.teacher_id {
            model.teacher_id = Set(Some(teacher_id));
        }
        if let Some(schedule) = update.schedule {
            model.schedule = Set(Some(serde_json::to_string(&schedule)?));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新课程失败: {e}")))?;

        self.get_course_by_id_impl(id).await
    }

    /// 删除课程（选课、资料记录随外键级联删除）
    pub async fn delete_course_impl(&self, id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn add_course_assignment_impl(
        &self,
        id: i64,
        assignment: Assignment,
    ) -> Result<Option<Course>> {
        let Some(mut course) = self.get_course_by_id_impl(id).await? else {
            return Ok(None);
        };
        course.assignments.push(assignment);

        ActiveModel {
            id: Set(id),
            assignments: Set(Some(serde_json::to_string(&course.assignments)?)),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("添加作业失败: {e}")))?;

        self.get_course_by_id_impl(id).await
    }

    pub async fn add_course_exam_impl(&self, id: i64, exam: Exam) -> Result<Option<Course>> {
        let Some(mut course) = self.get_course_by_id_impl(id).await? else {
            return Ok(None);
        };
        course.exams.push(exam);

        ActiveModel {
            id: Set(id),
            exams: Set(Some(serde_json::to_string(&course.exams)?)),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("添加考试失败: {e}")))?;

        self.get_course_by_id_impl(id).await
    }

    /// 选课，已选时返回 false
    pub async fn enroll_student_impl(&self, course_id: i64, student_id: i64) -> Result<bool> {
        if self.is_enrolled_impl(course_id, student_id).await? {
            return Ok(false);
        }

        EnrollmentActiveModel {
            course_id: Set(course_id),
            student_id: Set(student_id),
            enrolled_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("选课失败: {e}")))?;

        Ok(true)
    }

    pub async fn unenroll_student_impl(&self, course_id: i64, student_id: i64) -> Result<bool> {
        let result = CourseEnrollments::delete_many()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("退课失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    async fn is_enrolled_impl(&self, course_id: i64, student_id: i64) -> Result<bool> {
        let count = CourseEnrollments::find()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询选课失败: {e}")))?;

        Ok(count > 0)
    }

    pub async fn list_course_students_impl(&self, course_id: i64) -> Result<Vec<User>> {
        let rows = CourseEnrollments::find()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询选课学生失败: {e}")))?;

        let ids: Vec<i64> = rows.into_iter().map(|r| r.student_id).collect();
        self.get_users_by_ids_impl(&ids).await
    }

    pub async fn list_student_courses_impl(&self, student_id: i64) -> Result<Vec<Course>> {
        let rows = CourseEnrollments::find()
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学生课程失败: {e}")))?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let courses = Courses::find()
            .filter(Column::Id.is_in(rows.into_iter().map(|r| r.course_id)))
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学生课程失败: {e}")))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }

    pub async fn list_enrollments_impl(&self) -> Result<Vec<(i64, i64)>> {
        let rows = CourseEnrollments::find()
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|r| (r.course_id, r.student_id))
            .collect())
    }

    pub async fn create_course_material_impl(
        &self,
        material: NewCourseMaterial,
    ) -> Result<CourseMaterial> {
        let result = MaterialActiveModel {
            course_id: Set(material.course_id),
            title: Set(material.title),
            original_name: Set(material.original_name),
            stored_name: Set(material.stored_name),
            url: Set(material.url),
            file_size: Set(material.file_size),
            uploaded_by: Set(Some(material.uploaded_by)),
            uploaded_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("保存课程资料失败: {e}")))?;

        Ok(result.into_material())
    }

    pub async fn get_course_material_impl(&self, id: i64) -> Result<Option<CourseMaterial>> {
        let result = CourseMaterials::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程资料失败: {e}")))?;

        Ok(result.map(|m| m.into_material()))
    }

    pub async fn list_course_materials_impl(&self, course_id: i64) -> Result<Vec<CourseMaterial>> {
        let rows = CourseMaterials::find()
            .filter(MaterialColumn::CourseId.eq(course_id))
            .order_by_desc(MaterialColumn::UploadedAt)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程资料失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_material()).collect())
    }

    pub async fn delete_course_material_impl(&self, id: i64) -> Result<bool> {
        let result = CourseMaterials::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除课程资料失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
