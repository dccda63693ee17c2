use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 两步验证备用码表（只保存哈希）
        manager
            .create_table(
                Table::create()
                    .table(TwoFactorBackupCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TwoFactorBackupCodes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TwoFactorBackupCodes::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TwoFactorBackupCodes::CodeHash)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TwoFactorBackupCodes::UsedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(TwoFactorBackupCodes::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TwoFactorBackupCodes::Table, TwoFactorBackupCodes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_two_factor_backup_codes_user_id")
                    .table(TwoFactorBackupCodes::Table)
                    .col(TwoFactorBackupCodes::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TwoFactorBackupCodes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum TwoFactorBackupCodes {
    #[sea_orm(iden = "two_factor_backup_codes")]
    Table,
    Id,
    UserId,
    CodeHash,
    UsedAt,
    CreatedAt,
}
