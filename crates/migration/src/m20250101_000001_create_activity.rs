//! Create `activity` table.
//! One row per activity; listing sorts on `timestamp` by default, hence the index.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Activity::Table)
                    .if_not_exists()
                    .col(uuid(Activity::Id).primary_key())
                    // unbounded; only presence is validated
                    .col(text(Activity::Title))
                    .col(text(Activity::TitleSearch))
                    .col(text_null(Activity::Description))
                    .col(timestamp_with_time_zone(Activity::Timestamp).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_timestamp")
                    .table(Activity::Table)
                    .col(Activity::Timestamp)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Activity::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Activity {
    Table,
    Id,
    Title,
    TitleSearch,
    Description,
    Timestamp,
}
