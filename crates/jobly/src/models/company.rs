//! Company records, inputs and the company field table.

use crate::error::JoblyResult;
use crate::fields::{Field, FieldMap};
use crate::models::job::Job;
use crate::partial_update::Patch;
use crate::row::{FromRow, RowExt};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Updatable company fields. `handle` is the key and is not listed.
pub const COMPANY_FIELDS: FieldMap = FieldMap::new(
    "company",
    &[
        Field::same("name"),
        Field::same("description"),
        Field::renamed("numEmployees", "num_employees"),
        Field::renamed("logoUrl", "logo_url"),
    ],
);

/// Projection matching [`Company::from_row`].
pub(crate) const COMPANY_COLUMNS: &str = r#"handle, name, description, num_employees AS "numEmployees", logo_url AS "logoUrl""#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("numEmployees")?,
            logo_url: row.try_get_column("logoUrl")?,
        })
    }
}

/// A company together with the jobs it posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Partial company update; absent fields are left as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl From<CompanyUpdate> for Patch {
    fn from(update: CompanyUpdate) -> Self {
        Patch::new()
            .set_opt("name", update.name)
            .set_opt("description", update.description)
            .set_opt("numEmployees", update.num_employees)
            .set_opt("logoUrl", update.logo_url)
    }
}
