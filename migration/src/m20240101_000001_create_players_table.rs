use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Players::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Players::PrivateId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Players::Name).string().not_null().default(""))
                    .col(ColumnDef::new(Players::LastGuessDate).string().null())
                    .col(
                        ColumnDef::new(Players::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PlayerRooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlayerRooms::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlayerRooms::PlayerId).string().not_null())
                    .col(ColumnDef::new(PlayerRooms::RoomId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_player_rooms_player")
                            .from(PlayerRooms::Table, PlayerRooms::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One entry per room id for each player
        manager
            .create_index(
                Index::create()
                    .name("idx_player_rooms_player_room")
                    .table(PlayerRooms::Table)
                    .col(PlayerRooms::PlayerId)
                    .col(PlayerRooms::RoomId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Room leaderboard lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_player_rooms_room")
                    .table(PlayerRooms::Table)
                    .col(PlayerRooms::RoomId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Guesses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Guesses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Guesses::PlayerRoomId).integer().not_null())
                    .col(ColumnDef::new(Guesses::Attempt).small_integer().not_null())
                    .col(ColumnDef::new(Guesses::Found).boolean().not_null())
                    .col(ColumnDef::new(Guesses::Date).string().not_null())
                    .col(ColumnDef::new(Guesses::Alias).string().not_null())
                    .col(ColumnDef::new(Guesses::Speed).string().null())
                    .col(
                        ColumnDef::new(Guesses::Cheat)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guesses_player_room")
                            .from(Guesses::Table, Guesses::PlayerRoomId)
                            .to(PlayerRooms::Table, PlayerRooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Not unique: merges and admin date edits may leave several guesses on one day
        manager
            .create_index(
                Index::create()
                    .name("idx_guesses_room_date")
                    .table(Guesses::Table)
                    .col(Guesses::PlayerRoomId)
                    .col(Guesses::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Guesses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlayerRooms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Players {
    Table,
    Id,
    PrivateId,
    Name,
    LastGuessDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PlayerRooms {
    Table,
    Id,
    PlayerId,
    RoomId,
}

#[derive(DeriveIden)]
enum Guesses {
    Table,
    Id,
    PlayerRoomId,
    Attempt,
    Found,
    Date,
    Alias,
    Speed,
    Cheat,
}
