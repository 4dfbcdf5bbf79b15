use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Actors::Table)
                    .if_not_exists()
                    .col(pk_auto(Actors::Id))
                    .col(string_len(Actors::Name, 256))
                    .col(string_len(Actors::FullName, 512).default(""))
                    .col(string(Actors::DateOfBirth))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_actors_name")
                    .table(Actors::Table)
                    .col(Actors::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string_len(Movies::Title, 256))
                    .col(integer(Movies::ReleaseYear))
                    .col(integer(Movies::Duration))
                    .col(double(Movies::ImdbRating))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActorInMovie::Table)
                    .if_not_exists()
                    .col(integer(ActorInMovie::MovieId))
                    .col(integer(ActorInMovie::ActorId))
                    .primary_key(
                        Index::create().col(ActorInMovie::MovieId).col(ActorInMovie::ActorId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_actor_in_movie_movie")
                            .from(ActorInMovie::Table, ActorInMovie::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_actor_in_movie_actor")
                            .from(ActorInMovie::Table, ActorInMovie::ActorId)
                            .to(Actors::Table, Actors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_actor_in_movie_actor")
                    .table(ActorInMovie::Table)
                    .col(ActorInMovie::ActorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ActorInMovie::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Actors::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Actors {
    Table,
    Id,
    Name,
    FullName,
    DateOfBirth,
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    ReleaseYear,
    Duration,
    ImdbRating,
}

#[derive(DeriveIden)]
enum ActorInMovie {
    Table,
    MovieId,
    ActorId,
}
