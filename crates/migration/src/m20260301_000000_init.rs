//! Initial schema migration.
//!
//! - `users`: administrator-provisioned accounts
//! - `battery_types`: battery form factors ("AA", "AAA") per owner
//! - `battery_models`: battery models ("Rechargeable 1.2V") per owner
//! - `devices`: devices holding `capacity` batteries of one type
//! - `assignments`: battery models installed in a device

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum BatteryTypes {
    Table,
    Id,
    Code,
    Description,
    UserId,
}

#[derive(Iden)]
enum BatteryModels {
    Table,
    Id,
    Description,
    UserId,
}

#[derive(Iden)]
enum Devices {
    Table,
    Id,
    Description,
    BatteryTypeId,
    Capacity,
    UserId,
}

#[derive(Iden)]
enum Assignments {
    Table,
    Id,
    DeviceId,
    BatteryModelId,
    Quantity,
    UserId,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Battery types
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BatteryTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BatteryTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BatteryTypes::Code).string_len(10).not_null())
                    .col(
                        ColumnDef::new(BatteryTypes::Description)
                            .string_len(100)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(BatteryTypes::UserId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-battery_types-user_id")
                            .from(BatteryTypes::Table, BatteryTypes::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Battery models
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BatteryModels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BatteryModels::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BatteryModels::Description)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(BatteryModels::UserId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-battery_models-user_id")
                            .from(BatteryModels::Table, BatteryModels::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Devices
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Devices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Devices::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Devices::Description).string_len(100).not_null())
                    .col(ColumnDef::new(Devices::BatteryTypeId).integer().not_null())
                    .col(ColumnDef::new(Devices::Capacity).integer().not_null())
                    .col(ColumnDef::new(Devices::UserId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-devices-battery_type_id")
                            .from(Devices::Table, Devices::BatteryTypeId)
                            .to(BatteryTypes::Table, BatteryTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-devices-user_id")
                            .from(Devices::Table, Devices::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Assignments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assignments::DeviceId).integer().not_null())
                    .col(
                        ColumnDef::new(Assignments::BatteryModelId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignments::Quantity).integer().not_null())
                    .col(ColumnDef::new(Assignments::UserId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-assignments-device_id")
                            .from(Assignments::Table, Assignments::DeviceId)
                            .to(Devices::Table, Devices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-assignments-battery_model_id")
                            .from(Assignments::Table, Assignments::BatteryModelId)
                            .to(BatteryModels::Table, BatteryModels::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-assignments-user_id")
                            .from(Assignments::Table, Assignments::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Indexes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_index(
                Index::create()
                    .name("idx-battery_types-user_id")
                    .table(BatteryTypes::Table)
                    .col(BatteryTypes::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-battery_models-user_id")
                    .table(BatteryModels::Table)
                    .col(BatteryModels::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-devices-user_id-battery_type_id")
                    .table(Devices::Table)
                    .col(Devices::UserId)
                    .col(Devices::BatteryTypeId)
                    .to_owned(),
            )
            .await?;

        // Serves the per-device quantity sum of the allocation check.
        manager
            .create_index(
                Index::create()
                    .name("idx-assignments-user_id-device_id")
                    .table(Assignments::Table)
                    .col(Assignments::UserId)
                    .col(Assignments::DeviceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-assignments-battery_model_id")
                    .table(Assignments::Table)
                    .col(Assignments::BatteryModelId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Devices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BatteryModels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BatteryTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
