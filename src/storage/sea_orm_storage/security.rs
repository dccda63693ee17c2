//! 登录安全与两步验证存储操作

use super::SeaOrmStorage;
use crate::entity::two_factor_backup_codes::{
    ActiveModel as BackupCodeActiveModel, Column as BackupCodeColumn, Entity as BackupCodes,
};
use crate::entity::users::{Column, Entity as Users};
use crate::errors::{CampusError, Result};
use crate::models::users::entities::TrustedDevice;
use crate::storage::BackupCodeRecord;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn record_login_failure_impl(
        &self,
        id: i64,
        attempts: i32,
        lock_until: Option<DateTime<Utc>>,
    ) -> Result<()> {
        Users::update_many()
            .col_expr(Column::LoginAttempts, Expr::value(attempts))
            .col_expr(
                Column::LockUntil,
                Expr::value(lock_until.map(|t| t.timestamp())),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("记录登录失败次数失败: {e}")))?;

        Ok(())
    }

    pub async fn reset_login_attempts_impl(&self, id: i64) -> Result<()> {
        Users::update_many()
            .col_expr(Column::LoginAttempts, Expr::value(0))
            .col_expr(Column::LockUntil, Expr::value(Option::<i64>::None))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("重置登录失败次数失败: {e}")))?;

        Ok(())
    }

    /// 登录成功：清零计数、解除锁定、记录 IP 与时间
    pub async fn record_login_success_impl(&self, id: i64, ip: Option<String>) -> Result<()> {
        let now = Utc::now().timestamp();

        Users::update_many()
            .col_expr(Column::LoginAttempts, Expr::value(0))
            .col_expr(Column::LockUntil, Expr::value(Option::<i64>::None))
            .col_expr(Column::LastLoginIp, Expr::value(ip))
            .col_expr(Column::LastLoginAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新登录信息失败: {e}")))?;

        Ok(())
    }

    pub async fn set_trusted_devices_impl(&self, id: i64, devices: &[TrustedDevice]) -> Result<()> {
        let raw = serde_json::to_string(devices)?;

        Users::update_many()
            .col_expr(Column::TrustedDevices, Expr::value(raw))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新受信任设备失败: {e}")))?;

        Ok(())
    }

    pub async fn set_two_factor_impl(
        &self,
        id: i64,
        enabled: bool,
        secret: Option<String>,
    ) -> Result<()> {
        let now = Utc::now().timestamp();

        Users::update_many()
            .col_expr(Column::TwoFactorEnabled, Expr::value(enabled))
            .col_expr(Column::TwoFactorSecret, Expr::value(secret))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新两步验证设置失败: {e}")))?;

        Ok(())
    }

    pub async fn touch_two_factor_impl(&self, id: i64) -> Result<()> {
        let now = Utc::now().timestamp();

        Users::update_many()
            .col_expr(Column::TwoFactorLastUsedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新两步验证时间失败: {e}")))?;

        Ok(())
    }

    pub async fn get_two_factor_last_used_impl(&self, id: i64) -> Result<Option<DateTime<Utc>>> {
        let row = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(row
            .and_then(|m| m.two_factor_last_used_at)
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)))
    }

    /// 删除旧备用码并写入新一组
    pub async fn replace_backup_codes_impl(
        &self,
        user_id: i64,
        code_hashes: Vec<String>,
    ) -> Result<()> {
        let now = Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        BackupCodes::delete_many()
            .filter(BackupCodeColumn::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除备用码失败: {e}")))?;

        if !code_hashes.is_empty() {
            let models = code_hashes.into_iter().map(|hash| BackupCodeActiveModel {
                user_id: Set(user_id),
                code_hash: Set(hash),
                used_at: Set(None),
                created_at: Set(now),
                ..Default::default()
            });

            BackupCodes::insert_many(models)
                .exec(&txn)
                .await
                .map_err(|e| CampusError::database_operation(format!("写入备用码失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(())
    }

    pub async fn list_unused_backup_codes_impl(
        &self,
        user_id: i64,
    ) -> Result<Vec<BackupCodeRecord>> {
        let rows = BackupCodes::find()
            .filter(BackupCodeColumn::UserId.eq(user_id))
            .filter(BackupCodeColumn::UsedAt.is_null())
            .order_by_asc(BackupCodeColumn::Id)
            .limit(64)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询备用码失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|m| BackupCodeRecord {
                id: m.id,
                code_hash: m.code_hash,
            })
            .collect())
    }

    /// 条件更新，并发下同一备用码只能被消费一次
    pub async fn consume_backup_code_impl(&self, code_id: i64) -> Result<bool> {
        let now = Utc::now().timestamp();

        let result = BackupCodes::update_many()
            .col_expr(BackupCodeColumn::UsedAt, Expr::value(now))
            .filter(BackupCodeColumn::Id.eq(code_id))
            .filter(BackupCodeColumn::UsedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("消费备用码失败: {e}")))?;

        Ok(result.rows_affected == 1)
    }

    pub async fn count_unused_backup_codes_impl(&self, user_id: i64) -> Result<u64> {
        BackupCodes::find()
            .filter(BackupCodeColumn::UserId.eq(user_id))
            .filter(BackupCodeColumn::UsedAt.is_null())
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计备用码失败: {e}")))
    }
}
