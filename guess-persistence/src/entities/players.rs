use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "players")]
pub struct Model {
    /// Public id
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub private_id: String,
    pub name: String,
    pub last_guess_date: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::player_rooms::Entity")]
    PlayerRooms,
}

impl Related<super::player_rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlayerRooms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
