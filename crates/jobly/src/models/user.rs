//! User records and inputs. The stored credential never leaves the database.

use crate::error::JoblyResult;
use crate::fields::{Field, FieldMap};
use crate::partial_update::Patch;
use crate::row::{FromRow, RowExt};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Updatable user fields. `username` is the key and is not listed.
pub const USER_FIELDS: FieldMap = FieldMap::new(
    "user",
    &[
        Field::renamed("firstName", "first_name"),
        Field::renamed("lastName", "last_name"),
        Field::same("email"),
        Field::renamed("isAdmin", "is_admin"),
        Field::same("password"),
    ],
);

pub(crate) const USER_COLUMNS: &str = r#"username, first_name AS "firstName", last_name AS "lastName", email, is_admin AS "isAdmin""#;

/// Public user fields. The stored credential is never read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl FromRow for User {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            username: row.try_get_column("username")?,
            first_name: row.try_get_column("firstName")?,
            last_name: row.try_get_column("lastName")?,
            email: row.try_get_column("email")?,
            is_admin: row.try_get_column("isAdmin")?,
        })
    }
}

/// A user with the ids of the jobs they applied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub applications: Vec<i32>,
}

/// Registration body. `password` must already be hashed.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
    /// Already hashed.
    pub password: Option<String>,
}

impl std::fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserUpdate")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("is_admin", &self.is_admin)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl From<UserUpdate> for Patch {
    fn from(update: UserUpdate) -> Self {
        Patch::new()
            .set_opt("firstName", update.first_name)
            .set_opt("lastName", update.last_name)
            .set_opt("email", update.email)
            .set_opt("isAdmin", update.is_admin)
            .set_opt("password", update.password)
    }
}
