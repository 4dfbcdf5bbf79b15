use std::collections::BTreeSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use crate::{
    entities::{actor, actor_in_movie, movie},
    error::AppResult,
    models::{ActorChanges, MovieChanges, NewActor, NewMovie},
};

/// Row-level access to actors, movies and cast memberships.
///
/// Works against a plain connection or, after [`EntityStore::begin`], a
/// transaction that must be [`EntityStore::commit`]ted. Dropping an
/// uncommitted transaction rolls it back.
#[derive(Clone)]
pub struct EntityStore<C = DatabaseConnection> {
    conn: C,
}

impl EntityStore<DatabaseConnection> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { conn: db }
    }

    pub async fn begin(&self) -> AppResult<EntityStore<DatabaseTransaction>> {
        Ok(EntityStore { conn: self.conn.begin().await? })
    }
}

impl EntityStore<DatabaseTransaction> {
    pub async fn commit(self) -> AppResult<()> {
        self.conn.commit().await?;
        Ok(())
    }
}

impl<C: ConnectionTrait> EntityStore<C> {
    pub async fn list_actors(&self) -> AppResult<Vec<actor::Model>> {
        Ok(actor::Entity::find().order_by_asc(actor::Column::Id).all(&self.conn).await?)
    }

    pub async fn find_actor(&self, id: i32) -> AppResult<Option<actor::Model>> {
        Ok(actor::Entity::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn find_actor_with_movies(
        &self,
        id: i32,
    ) -> AppResult<Option<(actor::Model, Vec<movie::Model>)>> {
        let Some(actor) = self.find_actor(id).await? else {
            return Ok(None);
        };
        let movies = movie::Entity::find()
            .inner_join(actor_in_movie::Entity)
            .filter(actor_in_movie::Column::ActorId.eq(id))
            .order_by_asc(movie::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(Some((actor, movies)))
    }

    pub async fn actors_named(&self, names: &[String]) -> AppResult<Vec<actor::Model>> {
        Ok(actor::Entity::find()
            .filter(actor::Column::Name.is_in(names.iter().cloned()))
            .order_by_asc(actor::Column::Id)
            .all(&self.conn)
            .await?)
    }

    pub async fn create_actor(&self, new: &NewActor) -> AppResult<actor::Model> {
        let model = actor::ActiveModel {
            id: Default::default(),
            name: Set(new.name.clone()),
            full_name: Set(new.full_name.clone()),
            date_of_birth: Set(new.date_of_birth.to_string()),
        };
        let actor = model.insert(&self.conn).await?;
        debug!(actor_id = actor.id, "actor created");
        Ok(actor)
    }

    pub async fn update_actor(
        &self,
        id: i32,
        changes: &ActorChanges,
    ) -> AppResult<Option<actor::Model>> {
        let Some(actor) = self.find_actor(id).await? else {
            return Ok(None);
        };

        let mut model = actor.clone().into_active_model();
        if let Some(name) = &changes.name {
            model.name = Set(name.clone());
        }
        if let Some(full_name) = &changes.full_name {
            model.full_name = Set(full_name.clone());
        }
        if let Some(date_of_birth) = changes.date_of_birth {
            model.date_of_birth = Set(date_of_birth.to_string());
        }
        if !model.is_changed() {
            return Ok(Some(actor));
        }

        let actor = model.update(&self.conn).await?;
        debug!(actor_id = id, "actor updated");
        Ok(Some(actor))
    }

    /// Deletes the actor and every membership row that references it.
    pub async fn delete_actor(&self, id: i32) -> AppResult<bool> {
        if self.find_actor(id).await?.is_none() {
            return Ok(false);
        }
        let memberships = actor_in_movie::Entity::delete_many()
            .filter(actor_in_movie::Column::ActorId.eq(id))
            .exec(&self.conn)
            .await?;
        let deleted = actor::Entity::delete_by_id(id).exec(&self.conn).await?;
        debug!(
            actor_id = id,
            memberships = memberships.rows_affected,
            "actor deleted"
        );
        Ok(deleted.rows_affected > 0)
    }

    pub async fn list_movies(&self) -> AppResult<Vec<movie::Model>> {
        Ok(movie::Entity::find().order_by_asc(movie::Column::Id).all(&self.conn).await?)
    }

    pub async fn find_movie(&self, id: i32) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn find_movie_with_cast(
        &self,
        id: i32,
    ) -> AppResult<Option<(movie::Model, Vec<actor::Model>)>> {
        let Some(movie) = self.find_movie(id).await? else {
            return Ok(None);
        };
        let cast = actor::Entity::find()
            .inner_join(actor_in_movie::Entity)
            .filter(actor_in_movie::Column::MovieId.eq(id))
            .order_by_asc(actor::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(Some((movie, cast)))
    }

    /// Inserts the movie row only; membership rows are written separately.
    pub async fn create_movie(&self, new: &NewMovie) -> AppResult<movie::Model> {
        let model = movie::ActiveModel {
            id: Default::default(),
            title: Set(new.title.clone()),
            release_year: Set(new.release_year),
            duration: Set(new.duration),
            imdb_rating: Set(new.imdb_rating),
        };
        let movie = model.insert(&self.conn).await?;
        debug!(movie_id = movie.id, "movie created");
        Ok(movie)
    }

    /// Applies scalar changes only. `changes.cast` is ignored here.
    pub async fn update_movie(
        &self,
        id: i32,
        changes: &MovieChanges,
    ) -> AppResult<Option<movie::Model>> {
        let Some(movie) = self.find_movie(id).await? else {
            return Ok(None);
        };

        let mut model = movie.clone().into_active_model();
        if let Some(title) = &changes.title {
            model.title = Set(title.clone());
        }
        if let Some(release_year) = changes.release_year {
            model.release_year = Set(release_year);
        }
        if let Some(duration) = changes.duration {
            model.duration = Set(duration);
        }
        if let Some(imdb_rating) = changes.imdb_rating {
            model.imdb_rating = Set(imdb_rating);
        }
        if !model.is_changed() {
            return Ok(Some(movie));
        }

        let movie = model.update(&self.conn).await?;
        debug!(movie_id = id, "movie updated");
        Ok(Some(movie))
    }

    /// Deletes the movie and its membership rows.
    pub async fn delete_movie(&self, id: i32) -> AppResult<bool> {
        if self.find_movie(id).await?.is_none() {
            return Ok(false);
        }
        let memberships = actor_in_movie::Entity::delete_many()
            .filter(actor_in_movie::Column::MovieId.eq(id))
            .exec(&self.conn)
            .await?;
        let deleted = movie::Entity::delete_by_id(id).exec(&self.conn).await?;
        debug!(
            movie_id = id,
            memberships = memberships.rows_affected,
            "movie deleted"
        );
        Ok(deleted.rows_affected > 0)
    }

    /// Every membership row; an inspection helper, not used by the operations.
    pub async fn list_memberships(&self) -> AppResult<Vec<actor_in_movie::Model>> {
        Ok(actor_in_movie::Entity::find()
            .order_by_asc(actor_in_movie::Column::MovieId)
            .order_by_asc(actor_in_movie::Column::ActorId)
            .all(&self.conn)
            .await?)
    }

    pub async fn cast_ids(&self, movie_id: i32) -> AppResult<BTreeSet<i32>> {
        let rows = actor_in_movie::Entity::find()
            .filter(actor_in_movie::Column::MovieId.eq(movie_id))
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(|row| row.actor_id).collect())
    }

    pub async fn add_memberships(&self, movie_id: i32, actor_ids: &BTreeSet<i32>) -> AppResult<()> {
        if actor_ids.is_empty() {
            return Ok(());
        }
        let rows = actor_ids.iter().map(|&actor_id| actor_in_movie::ActiveModel {
            movie_id: Set(movie_id),
            actor_id: Set(actor_id),
        });
        // Composite keys have no single last-insert id to read back.
        actor_in_movie::Entity::insert_many(rows).exec_without_returning(&self.conn).await?;
        debug!(movie_id, added = actor_ids.len(), "memberships added");
        Ok(())
    }

    pub async fn remove_memberships(
        &self,
        movie_id: i32,
        actor_ids: &BTreeSet<i32>,
    ) -> AppResult<()> {
        if actor_ids.is_empty() {
            return Ok(());
        }
        actor_in_movie::Entity::delete_many()
            .filter(actor_in_movie::Column::MovieId.eq(movie_id))
            .filter(actor_in_movie::Column::ActorId.is_in(actor_ids.iter().copied()))
            .exec(&self.conn)
            .await?;
        debug!(movie_id, removed = actor_ids.len(), "memberships removed");
        Ok(())
    }
}
