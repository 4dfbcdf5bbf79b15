pub mod actor;
pub mod actor_in_movie;
pub mod movie;
