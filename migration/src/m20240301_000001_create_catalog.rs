use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::MovId))
                    .col(string(Movies::MovTitle))
                    .col(string_len(Movies::MovRelease, 4))
                    .col(string_len_null(Movies::MovLanguage, 2))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actors::Table)
                    .if_not_exists()
                    .col(pk_auto(Actors::ActId))
                    .col(string(Actors::ActFirstname))
                    .col(string(Actors::ActLastname))
                    .col(string_null(Actors::ActLanguage))
                    .col(string_null(Actors::ActGender))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Casts::Table)
                    .if_not_exists()
                    .col(pk_auto(Casts::CasId))
                    .col(integer(Casts::MovId))
                    .col(integer(Casts::ActId))
                    .col(string_null(Casts::CasRole))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_casts_movie")
                            .from(Casts::Table, Casts::MovId)
                            .to(Movies::Table, Movies::MovId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_casts_actor")
                            .from(Casts::Table, Casts::ActId)
                            .to(Actors::Table, Actors::ActId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_casts_actor")
                    .table(Casts::Table)
                    .col(Casts::ActId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Casts::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Actors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    MovId,
    MovTitle,
    MovRelease,
    MovLanguage,
}

#[derive(DeriveIden)]
enum Actors {
    Table,
    ActId,
    ActFirstname,
    ActLastname,
    ActLanguage,
    ActGender,
}

#[derive(DeriveIden)]
enum Casts {
    Table,
    CasId,
    MovId,
    ActId,
    CasRole,
}
