use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "guesses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub player_room_id: i64,
    pub attempt: i16,
    pub found: bool,
    pub date: String,
    pub alias: String,
    pub speed: Option<String>,
    pub cheat: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::player_rooms::Entity",
        from = "Column::PlayerRoomId",
        to = "super::player_rooms::Column::Id",
        on_delete = "Cascade"
    )]
    PlayerRooms,
}

impl Related<super::player_rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlayerRooms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
