use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Every column except the key is nullable: tasks may be created empty
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tasks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_null(Tasks::TaskName))
                    .col(text_null(Tasks::TaskDetails))
                    .col(timestamp_null(Tasks::Deadline))
                    .col(small_integer_null(Tasks::Completed))
                    .col(string_null(Tasks::Priority))
                    .col(small_integer_null(Tasks::SetReminder))
                    .col(time_null(Tasks::TaskStart))
                    .col(date_null(Tasks::StartDate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_deadline")
                    .table(Tasks::Table)
                    .col(Tasks::Deadline)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_start_date")
                    .table(Tasks::Table)
                    .col(Tasks::StartDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    TaskName,
    TaskDetails,
    Deadline,
    Completed,
    Priority,
    SetReminder,
    #[sea_orm(iden = "taskStart")]
    TaskStart,
    #[sea_orm(iden = "startDate")]
    StartDate,
}
