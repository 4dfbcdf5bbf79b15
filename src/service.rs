//! The ten casting operations.
//!
//! Each operation authorizes the caller before touching storage. Writes that
//! span more than one row (movie + memberships, deletes with their cascade)
//! run in a single transaction; returning early with `?` drops the
//! transaction and rolls it back.

use tracing::info;

use crate::{
    cast,
    error::{AppError, AppResult},
    models::{
        ActorChanges, ActorFull, ActorRequest, ActorShort, MovieChanges, MovieFull, MovieRequest,
        MovieShort, NewActor, NewMovie,
    },
    permissions::{Operation, PermissionSet, authorize},
    store::EntityStore,
};

#[derive(Clone)]
pub struct ResourceService {
    store: EntityStore,
}

impl ResourceService {
    pub fn new(store: EntityStore) -> Self {
        Self { store }
    }

    /// Read-side access to the underlying rows, for inspection.
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub async fn list_actors(&self, caller: &PermissionSet) -> AppResult<Vec<ActorShort>> {
        authorize(Operation::ListActors, caller)?;
        let actors = self.store.list_actors().await?;
        Ok(actors.iter().map(ActorShort::from).collect())
    }

    pub async fn get_actor(&self, caller: &PermissionSet, id: i32) -> AppResult<ActorFull> {
        authorize(Operation::GetActor, caller)?;
        let (actor, movies) =
            self.store.find_actor_with_movies(id).await?.ok_or(AppError::NotFound)?;
        Ok(ActorFull::new(&actor, &movies))
    }

    pub async fn create_actor(&self, caller: &PermissionSet, req: ActorRequest) -> AppResult<i32> {
        authorize(Operation::CreateActor, caller)?;
        let new = NewActor::try_from(req)?;
        let actor = self.store.create_actor(&new).await?;
        info!(actor_id = actor.id, name = %actor.name, "created actor");
        Ok(actor.id)
    }

    pub async fn update_actor(
        &self,
        caller: &PermissionSet,
        id: i32,
        req: ActorRequest,
    ) -> AppResult<ActorFull> {
        authorize(Operation::UpdateActor, caller)?;
        let tx = self.store.begin().await?;
        if tx.find_actor(id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        let changes = ActorChanges::try_from(req)?;

        tx.update_actor(id, &changes).await?.ok_or(AppError::NotFound)?;
        let (actor, movies) = tx.find_actor_with_movies(id).await?.ok_or(AppError::NotFound)?;
        tx.commit().await?;

        info!(actor_id = id, "updated actor");
        Ok(ActorFull::new(&actor, &movies))
    }

    pub async fn delete_actor(&self, caller: &PermissionSet, id: i32) -> AppResult<i32> {
        authorize(Operation::DeleteActor, caller)?;
        let tx = self.store.begin().await?;
        if !tx.delete_actor(id).await? {
            return Err(AppError::NotFound);
        }
        tx.commit().await?;
        info!(actor_id = id, "deleted actor");
        Ok(id)
    }

    pub async fn list_movies(&self, caller: &PermissionSet) -> AppResult<Vec<MovieShort>> {
        authorize(Operation::ListMovies, caller)?;
        let movies = self.store.list_movies().await?;
        Ok(movies.iter().map(MovieShort::from).collect())
    }

    pub async fn get_movie(&self, caller: &PermissionSet, id: i32) -> AppResult<MovieFull> {
        authorize(Operation::GetMovie, caller)?;
        let (movie, cast) = self.store.find_movie_with_cast(id).await?.ok_or(AppError::NotFound)?;
        Ok(MovieFull::new(&movie, &cast))
    }

    pub async fn create_movie(&self, caller: &PermissionSet, req: MovieRequest) -> AppResult<i32> {
        authorize(Operation::CreateMovie, caller)?;
        let new = NewMovie::try_from(req)?;

        let tx = self.store.begin().await?;
        let actor_ids = cast::resolve(&tx, &new.cast).await?;
        let movie = tx.create_movie(&new).await?;
        tx.add_memberships(movie.id, &actor_ids).await?;
        tx.commit().await?;

        info!(movie_id = movie.id, title = %movie.title, cast = actor_ids.len(), "created movie");
        Ok(movie.id)
    }

    /// A present `cast` replaces the whole cast; it is never merged.
    pub async fn update_movie(
        &self,
        caller: &PermissionSet,
        id: i32,
        req: MovieRequest,
    ) -> AppResult<MovieFull> {
        authorize(Operation::UpdateMovie, caller)?;
        let tx = self.store.begin().await?;
        if tx.find_movie(id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        let changes = MovieChanges::try_from(req)?;
        let desired = match &changes.cast {
            Some(names) => Some(cast::resolve(&tx, names).await?),
            None => None,
        };

        if changes.has_scalar_changes() {
            tx.update_movie(id, &changes).await?.ok_or(AppError::NotFound)?;
        }
        if let Some(desired) = desired {
            let diff = cast::diff(&tx, id, &desired).await?;
            tx.remove_memberships(id, &diff.to_remove).await?;
            tx.add_memberships(id, &diff.to_add).await?;
        }

        let (movie, cast) = tx.find_movie_with_cast(id).await?.ok_or(AppError::NotFound)?;
        tx.commit().await?;

        info!(movie_id = id, "updated movie");
        Ok(MovieFull::new(&movie, &cast))
    }

    pub async fn delete_movie(&self, caller: &PermissionSet, id: i32) -> AppResult<i32> {
        authorize(Operation::DeleteMovie, caller)?;
        let tx = self.store.begin().await?;
        if !tx.delete_movie(id).await? {
            return Err(AppError::NotFound);
        }
        tx.commit().await?;
        info!(movie_id = id, "deleted movie");
        Ok(id)
    }
}
