use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::catalog::tags::{normalize_tags, split_tags};
use crate::errors::AppError;
use crate::models::validation::{check_email, check_length};

const NAME_MAX: usize = 100;

/// A `users` row as stored. `interests` is the comma-delimited column.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub interests: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub interests: Vec<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            interests: split_tags(row.interests.as_deref()),
        }
    }
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub interests: Option<Vec<String>>,
}

impl UserCreate {
    pub fn validate(&self) -> Result<(), AppError> {
        check_length("name", &self.name, 1, NAME_MAX)?;
        check_email(&self.email)
    }

    pub fn interests(&self) -> Vec<String> {
        self.interests
            .as_deref()
            .map(normalize_tags)
            .unwrap_or_default()
    }
}

/// Body of `PUT /users/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub interests: Option<Vec<String>>,
}

impl UserPatch {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            check_length("name", name, 1, NAME_MAX)?;
        }
        if let Some(email) = &self.email {
            check_email(email)?;
        }
        Ok(())
    }
}

impl User {
    /// Merges a patch into this user, returning the updated record.
    pub fn apply(self, patch: UserPatch) -> Self {
        Self {
            id: self.id,
            name: patch.name.unwrap_or(self.name),
            email: patch.email.unwrap_or(self.email),
            interests: patch
                .interests
                .map(|tags| normalize_tags(&tags))
                .unwrap_or(self.interests),
        }
    }
}
