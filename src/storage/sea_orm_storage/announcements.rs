//! 公告存储操作

use super::SeaOrmStorage;
use crate::entity::announcements::{ActiveModel, Column, Entity as Announcements};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginationInfo,
    announcements::{
        Announcement, AnnouncementListResponse, CreateAnnouncementRequest,
        UpdateAnnouncementRequest,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;

impl SeaOrmStorage {
    pub async fn create_announcement_impl(
        &self,
        teacher_id: i64,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement> {
        let now = chrono::Utc::now();

        let result = ActiveModel {
            title: Set(req.title),
            content: Set(req.content),
            date: Set(req.date.unwrap_or(now).timestamp()),
            teacher_id: Set(teacher_id),
            created_at: Set(now.timestamp()),
            updated_at: Set(now.timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("发布公告失败: {e}")))?;

        let teacher_name = self.teacher_name(result.teacher_id).await?;
        Ok(result.into_announcement(teacher_name))
    }

    pub async fn get_announcement_by_id_impl(&self, id: i64) -> Result<Option<Announcement>> {
        let Some(model) = Announcements::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询公告失败: {e}")))?
        else {
            return Ok(None);
        };

        let teacher_name = self.teacher_name(model.teacher_id).await?;
        Ok(Some(model.into_announcement(teacher_name)))
    }

    /// 按日期倒序分页
    pub async fn list_announcements_with_pagination_impl(
        &self,
        page: u64,
        size: u64,
    ) -> Result<AnnouncementListResponse> {
        let paginator = Announcements::find()
            .order_by_desc(Column::Date)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| CampusError::database_operation(format!("查询公告总数失败: {e}")))?;

        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询公告列表失败: {e}")))?;

        let teacher_ids: Vec<i64> = rows.iter().map(|r| r.teacher_id).collect();
        let names: HashMap<i64, String> = if teacher_ids.is_empty() {
            HashMap::new()
        } else {
            Users::find()
                .filter(UserColumn::Id.is_in(teacher_ids))
                .all(&self.db)
                .await
                .map_err(|e| CampusError::database_operation(format!("查询教师失败: {e}")))?
                .into_iter()
                .map(|u| (u.id, u.name))
                .collect()
        };

        Ok(AnnouncementListResponse {
            items: rows
                .into_iter()
                .map(|r| {
                    let name = names.get(&r.teacher_id).cloned();
                    r.into_announcement(name)
                })
                .collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_announcement_impl(
        &self,
        id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>> {
        if self.get_announcement_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(content) = update.content {
            model.content = Set(content);
        }
        if let Some(date) = update.date {
            model.date = Set(date.timestamp());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新公告失败: {e}")))?;

        self.get_announcement_by_id_impl(id).await
    }

    pub async fn delete_announcement_impl(&self, id: i64) -> Result<bool> {
        let result = Announcements::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除公告失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    async fn teacher_name(&self, teacher_id: i64) -> Result<Option<String>> {
        let user = Users::find_by_id(teacher_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(user.map(|u| u.name))
    }
}
