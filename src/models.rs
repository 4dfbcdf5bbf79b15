use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::{
    cast::CastResolutionError,
    entities::{actor, movie},
    error::ValidationError,
};

const DISPLAY_DATE: &str = "%B %d, %Y";

/// Body of `POST /actors` and `PATCH /actors/{id}`. `null` reads as absent.
#[derive(Debug, Default, Deserialize)]
pub struct ActorRequest {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub date_of_birth: Option<String>,
}

/// Body of `POST /movies` and `PATCH /movies/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct MovieRequest {
    pub title: Option<String>,
    pub release_year: Option<i32>,
    pub duration: Option<i32>,
    pub imdb_rating: Option<f64>,
    pub cast: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewActor {
    pub name: String,
    pub full_name: String,
    pub date_of_birth: Date,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActorChanges {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub date_of_birth: Option<Date>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub release_year: i32,
    pub duration: i32,
    pub imdb_rating: f64,
    pub cast: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub release_year: Option<i32>,
    pub duration: Option<i32>,
    pub imdb_rating: Option<f64>,
    pub cast: Option<Vec<String>>,
}

impl MovieChanges {
    pub fn has_scalar_changes(&self) -> bool {
        self.title.is_some()
            || self.release_year.is_some()
            || self.duration.is_some()
            || self.imdb_rating.is_some()
    }
}

impl TryFrom<ActorRequest> for NewActor {
    type Error = ValidationError;

    fn try_from(req: ActorRequest) -> Result<Self, Self::Error> {
        let name = non_empty("name", req.name.ok_or(ValidationError::Missing("name"))?)?;
        let date_of_birth =
            parse_date(&req.date_of_birth.ok_or(ValidationError::Missing("date_of_birth"))?)?;
        Ok(Self { name, full_name: req.full_name.unwrap_or_default(), date_of_birth })
    }
}

impl TryFrom<ActorRequest> for ActorChanges {
    type Error = ValidationError;

    fn try_from(req: ActorRequest) -> Result<Self, Self::Error> {
        let changes = Self {
            name: req.name.map(|v| non_empty("name", v)).transpose()?,
            full_name: req.full_name.map(|v| non_empty("full_name", v)).transpose()?,
            date_of_birth: req.date_of_birth.as_deref().map(parse_date).transpose()?,
        };
        if changes == Self::default() {
            return Err(ValidationError::NoChanges);
        }
        Ok(changes)
    }
}

impl TryFrom<MovieRequest> for NewMovie {
    type Error = ValidationError;

    fn try_from(req: MovieRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: non_empty("title", req.title.ok_or(ValidationError::Missing("title"))?)?,
            release_year: positive(
                "release_year",
                req.release_year.ok_or(ValidationError::Missing("release_year"))?,
            )?,
            duration: positive(
                "duration",
                req.duration.ok_or(ValidationError::Missing("duration"))?,
            )?,
            imdb_rating: rating(req.imdb_rating.ok_or(ValidationError::Missing("imdb_rating"))?)?,
            cast: cast(req.cast.ok_or(ValidationError::Missing("cast"))?)?,
        })
    }
}

impl TryFrom<MovieRequest> for MovieChanges {
    type Error = ValidationError;

    fn try_from(req: MovieRequest) -> Result<Self, Self::Error> {
        let changes = Self {
            title: req.title.map(|v| non_empty("title", v)).transpose()?,
            release_year: req.release_year.map(|v| positive("release_year", v)).transpose()?,
            duration: req.duration.map(|v| positive("duration", v)).transpose()?,
            imdb_rating: req.imdb_rating.map(rating).transpose()?,
            cast: req.cast.map(cast).transpose()?,
        };
        if !changes.has_scalar_changes() && changes.cast.is_none() {
            return Err(ValidationError::NoChanges);
        }
        Ok(changes)
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() { Err(ValidationError::Empty(field)) } else { Ok(value) }
}

fn positive(field: &'static str, value: i32) -> Result<i32, ValidationError> {
    if value > 0 { Ok(value) } else { Err(ValidationError::NotPositive(field)) }
}

fn rating(value: f64) -> Result<f64, ValidationError> {
    if (0.0..=10.0).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::RatingOutOfRange(value))
    }
}

fn cast(names: Vec<String>) -> Result<Vec<String>, ValidationError> {
    if names.is_empty() {
        return Err(CastResolutionError::Empty.into());
    }
    Ok(names)
}

/// Accepts `1988-04-30` or `April 30, 1988`.
pub fn parse_date(raw: &str) -> Result<Date, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Empty("date_of_birth"));
    }
    raw.parse::<Date>()
        .or_else(|_| Date::strptime(DISPLAY_DATE, raw))
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

fn display_date(stored: &str) -> String {
    match stored.parse::<Date>() {
        Ok(date) => date.strftime(DISPLAY_DATE).to_string(),
        Err(_) => stored.to_string(),
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ActorShort {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ActorLong {
    pub id: i32,
    pub name: String,
    pub full_name: String,
    pub date_of_birth: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ActorFull {
    #[serde(flatten)]
    pub info: ActorLong,
    pub movies: Vec<String>,
}

impl From<&actor::Model> for ActorShort {
    fn from(actor: &actor::Model) -> Self {
        Self { id: actor.id, name: actor.name.clone() }
    }
}

impl From<&actor::Model> for ActorLong {
    fn from(actor: &actor::Model) -> Self {
        Self {
            id: actor.id,
            name: actor.name.clone(),
            full_name: actor.full_name.clone(),
            date_of_birth: display_date(&actor.date_of_birth),
        }
    }
}

impl ActorFull {
    pub fn new(actor: &actor::Model, movies: &[movie::Model]) -> Self {
        Self {
            info: ActorLong::from(actor),
            movies: movies.iter().map(|m| m.title.clone()).collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct MovieShort {
    pub id: i32,
    pub title: String,
    pub release_year: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct MovieLong {
    pub id: i32,
    pub title: String,
    pub release_year: i32,
    pub duration: i32,
    pub imdb_rating: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct MovieFull {
    #[serde(flatten)]
    pub info: MovieLong,
    pub cast: Vec<String>,
}

impl From<&movie::Model> for MovieShort {
    fn from(movie: &movie::Model) -> Self {
        Self { id: movie.id, title: movie.title.clone(), release_year: movie.release_year }
    }
}

impl From<&movie::Model> for MovieLong {
    fn from(movie: &movie::Model) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            release_year: movie.release_year,
            duration: movie.duration,
            imdb_rating: movie.imdb_rating,
        }
    }
}

impl MovieFull {
    pub fn new(movie: &movie::Model, cast: &[actor::Model]) -> Self {
        Self { info: MovieLong::from(movie), cast: cast.iter().map(|a| a.name.clone()).collect() }
    }
}
