//! 家长-子女关联存储操作

use super::SeaOrmStorage;
use crate::entity::parent_children::{ActiveModel, Column, Entity as ParentChildren};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{CampusError, Result};
use crate::models::users::entities::User;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 关联子女，已关联时返回 false
    ///
    /// 关联记录、学生的 parent_id 与家长的 child_usn 在同一事务内写入。
    pub async fn link_child_impl(&self, parent_id: i64, student_id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = ParentChildren::find()
            .filter(Column::ParentId.eq(parent_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询关联失败: {e}")))?;
        if existing.is_some() {
            return Ok(false);
        }

        let student = Users::find_by_id(student_id)
            .one(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学生失败: {e}")))?
            .ok_or_else(|| CampusError::not_found(format!("学生不存在: {student_id}")))?;

        ActiveModel {
            parent_id: Set(parent_id),
            student_id: Set(student_id),
            linked_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| CampusError::database_operation(format!("创建关联失败: {e}")))?;

        Users::update_many()
            .col_expr(UserColumn::ParentId, Expr::value(parent_id))
            .col_expr(UserColumn::UpdatedAt, Expr::value(now))
            .filter(UserColumn::Id.eq(student_id))
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新学生失败: {e}")))?;

        Users::update_many()
            .col_expr(UserColumn::ChildUsn, Expr::value(student.usn))
            .col_expr(UserColumn::UpdatedAt, Expr::value(now))
            .filter(UserColumn::Id.eq(parent_id))
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新家长失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }

    /// 解除关联
    pub async fn unlink_child_impl(&self, parent_id: i64, student_id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        let result = ParentChildren::delete_many()
            .filter(Column::ParentId.eq(parent_id))
            .filter(Column::StudentId.eq(student_id))
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除关联失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        // 仅当学生仍指向该家长时清空
        Users::update_many()
            .col_expr(UserColumn::ParentId, Expr::value(Option::<i64>::None))
            .col_expr(UserColumn::UpdatedAt, Expr::value(now))
            .filter(UserColumn::Id.eq(student_id))
            .filter(UserColumn::ParentId.eq(parent_id))
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新学生失败: {e}")))?;

        // 家长的 child_usn 指向剩余的任一子女
        let remaining = ParentChildren::find()
            .filter(Column::ParentId.eq(parent_id))
            .order_by_asc(Column::LinkedAt)
            .one(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询关联失败: {e}")))?;
        let next_usn = match remaining {
            Some(link) => Users::find_by_id(link.student_id)
                .one(&txn)
                .await
                .map_err(|e| CampusError::database_operation(format!("查询学生失败: {e}")))?
                .and_then(|s| s.usn),
            None => None,
        };

        Users::update_many()
            .col_expr(UserColumn::ChildUsn, Expr::value(next_usn))
            .col_expr(UserColumn::UpdatedAt, Expr::value(now))
            .filter(UserColumn::Id.eq(parent_id))
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新家长失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }

    pub async fn list_children_impl(&self, parent_id: i64) -> Result<Vec<User>> {
        let links = ParentChildren::find()
            .filter(Column::ParentId.eq(parent_id))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询子女失败: {e}")))?;

        let ids: Vec<i64> = links.into_iter().map(|l| l.student_id).collect();
        self.get_users_by_ids_impl(&ids).await
    }

    pub async fn is_parent_of_impl(&self, parent_id: i64, student_id: i64) -> Result<bool> {
        let count = ParentChildren::find()
            .filter(Column::ParentId.eq(parent_id))
            .filter(Column::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询关联失败: {e}")))?;

        Ok(count > 0)
    }
}
