use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "actors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub name: String,
    pub full_name: String,
    /// ISO-8601 calendar date.
    pub date_of_birth: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::actor_in_movie::Entity")]
    ActorInMovie,
}

impl Related<super::actor_in_movie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActorInMovie.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
