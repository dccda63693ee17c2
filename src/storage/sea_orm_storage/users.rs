use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginationInfo,
    users::{
        entities::{User, UserKind, UserRole},
        requests::{NewUser, UserListQuery, UserUpdate},
        responses::UserListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建用户，角色字段按 kind 写入
    pub async fn create_user_impl(&self, req: NewUser) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            name: Set(req.name),
            email: Set(req.email.trim().to_lowercase()),
            password_hash: Set(req.password_hash),
            role: Set(req.kind.role().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match req.kind {
            UserKind::Student(s) => {
                model.usn = Set(Some(s.usn.trim().to_uppercase()));
                model.branch = Set(Some(s.branch.to_string()));
                model.semester = Set(Some(s.semester));
                model.cgpa = Set(Some(s.cgpa));
                model.attendance_percentage = Set(Some(s.attendance_percentage));
                model.parent_id = Set(s.parent_id);
            }
            UserKind::Parent(p) => {
                model.child_usn = Set(p.child_usn);
            }
            UserKind::Teacher(t) => {
                model.faculty_id = Set(Some(t.faculty_id));
                model.department = Set(Some(t.department.to_string()));
                model.designation = Set(Some(t.designation.to_string()));
                model.is_admin = Set(t.is_admin);
            }
        }

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户（邮箱统一小写存储）
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn get_student_by_usn_impl(&self, usn: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Role.eq(UserRole::STUDENT))
            .filter(Column::Usn.eq(usn.trim().to_uppercase()))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn get_teacher_by_faculty_id_impl(&self, faculty_id: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Role.eq(UserRole::TEACHER))
            .filter(Column::FacultyId.eq(faculty_id.trim()))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Users::find();

        // 搜索条件：姓名 / 邮箱 / USN / 工号
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Name.contains(&escaped))
                    .add(Column::Email.contains(&escaped))
                    .add(Column::Usn.contains(&escaped))
                    .add(Column::FacultyId.contains(&escaped)),
            );
        }

        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        if let Some(branch) = query.branch {
            select = select.filter(Column::Branch.eq(branch.to_string()));
        }

        if let Some(department) = query.department {
            select = select.filter(Column::Department.eq(department.to_string()));
        }

        if let Some(semester) = query.semester {
            select = select.filter(Column::Semester.eq(semester));
        }

        select = select.order_by_asc(Column::Name);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CampusError::database_operation(format!("查询用户总数失败: {e}")))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn list_users_by_role_impl(&self, role: UserRole) -> Result<Vec<User>> {
        let users = Users::find()
            .filter(Column::Role.eq(role.to_string()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    pub async fn get_users_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = Users::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("批量查询用户失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 更新用户信息
    pub async fn update_user_impl(&self, id: i64, update: UserUpdate) -> Result<Option<User>> {
        // 先检查用户是否存在
        let existing = self.get_user_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(email) = update.email {
            model.email = Set(email.trim().to_lowercase());
        }
        if let Some(hash) = update.password_hash {
            model.password_hash = Set(hash);
        }
        if let Some(usn) = update.usn {
            model.usn = Set(Some(usn.trim().to_uppercase()));
        }
        if let Some(branch) = update.branch {
            model.branch = Set(Some(branch.to_string()));
        }
        if let Some(semester) = update.semester {
            model.semester = Set(Some(semester));
        }
        if let Some(cgpa) = update.cgpa {
            model.cgpa = Set(Some(cgpa));
        }
        if let Some(percentage) = update.attendance_percentage {
            model.attendance_percentage = Set(Some(percentage));
        }
        if let Some(child_usn) = update.child_usn {
            model.child_usn = Set(child_usn);
        }
        if let Some(faculty_id) = update.faculty_id {
            model.faculty_id = Set(Some(faculty_id));
        }
        if let Some(department) = update.department {
            model.department = Set(Some(department.to_string()));
        }
        if let Some(designation) = update.designation {
            model.designation = Set(Some(designation.to_string()));
        }
        if let Some(is_admin) = update.is_admin {
            model.is_admin = Set(is_admin);
        }
        if let Some(picture) = update.profile_picture {
            match picture {
                Some(p) => {
                    model.profile_picture_file = Set(Some(p.filename));
                    model.profile_picture_url = Set(Some(p.url));
                    model.profile_picture_uploaded_at = Set(Some(p.uploaded_at.timestamp()));
                }
                None => {
                    model.profile_picture_file = Set(None);
                    model.profile_picture_url = Set(None);
                    model.profile_picture_uploaded_at = Set(None);
                }
            }
        }
        if let Some(prefs) = update.preferences {
            model.theme = Set(prefs.theme.to_string());
            model.notify_email = Set(prefs.notifications.email);
            model.notify_push = Set(prefs.notifications.push);
            model.notify_announcements = Set(prefs.notifications.announcements);
            model.profile_visibility = Set(prefs.privacy.profile_visibility.to_string());
            model.show_email = Set(prefs.privacy.show_email);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新用户失败: {e}")))?;

        self.get_user_by_id_impl(id).await
    }

    /// 删除用户
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计用户数量失败: {e}")))
    }

    pub async fn count_users_by_role_impl(&self, role: UserRole) -> Result<u64> {
        Users::find()
            .filter(Column::Role.eq(role.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计用户数量失败: {e}")))
    }
}
