//! Permission-scoped access control.
//!
//! A caller's [`PermissionSet`] comes from the `permissions` claim of a
//! verified token. Every [`Operation`] requires exactly one permission, and
//! [`authorize`] is consulted before an operation touches storage.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

/// Scope strings a verified caller is entitled to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    pub fn contains(&self, permission: &str) -> bool {
        self.0.contains(permission)
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Operation {
    ListActors,
    GetActor,
    CreateActor,
    UpdateActor,
    DeleteActor,
    ListMovies,
    GetMovie,
    CreateMovie,
    UpdateMovie,
    DeleteMovie,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::ListActors,
        Operation::GetActor,
        Operation::CreateActor,
        Operation::UpdateActor,
        Operation::DeleteActor,
        Operation::ListMovies,
        Operation::GetMovie,
        Operation::CreateMovie,
        Operation::UpdateMovie,
        Operation::DeleteMovie,
    ];

    pub fn required_permission(self) -> &'static str {
        match self {
            Operation::ListActors => "get:actors",
            Operation::GetActor => "get:actor-by-id",
            Operation::CreateActor => "post:actors",
            Operation::UpdateActor => "patch:actors",
            Operation::DeleteActor => "delete:actors",
            Operation::ListMovies => "get:movies",
            Operation::GetMovie => "get:movie-by-id",
            Operation::CreateMovie => "post:movies",
            Operation::UpdateMovie => "patch:movies",
            Operation::DeleteMovie => "delete:movies",
        }
    }
}

/// Allows `op` when the caller holds its required permission.
pub fn authorize(op: Operation, caller: &PermissionSet) -> AppResult<()> {
    let required = op.required_permission();
    if caller.contains(required) {
        debug!(operation = ?op, permission = required, "authorized");
        Ok(())
    } else {
        warn!(operation = ?op, permission = required, "permission denied");
        Err(AppError::Forbidden(required))
    }
}
