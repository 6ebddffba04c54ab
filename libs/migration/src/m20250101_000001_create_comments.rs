use sea_orm_migration::{prelude::*, schema::*};

/// Guarded like the table itself, so a pre-existing `comments` table does not
/// fail the migration.
const BODY_NOT_EMPTY: &str = r#"
DO $$
BEGIN
    IF NOT EXISTS (
        SELECT 1 FROM pg_constraint WHERE conname = 'comments_body_not_empty'
    ) THEN
        ALTER TABLE comments
            ADD CONSTRAINT comments_body_not_empty CHECK (char_length(body) > 0);
    END IF;
END
$$;
"#;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string(Comments::Author).default("anonymous"))
                    .col(string_null(Comments::Email))
                    .col(text(Comments::Body))
                    .col(
                        timestamp_with_time_zone(Comments::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Empty bodies are rejected upstream too; keep manual inserts honest.
        manager
            .get_connection()
            .execute_unprepared(BODY_NOT_EMPTY)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comments::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    Author,
    Email,
    Body,
    CreatedAt,
}
