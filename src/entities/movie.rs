use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub release_year: i32,
    /// Minutes.
    pub duration: i32,
    #[sea_orm(column_type = "Double")]
    pub imdb_rating: f64,
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
