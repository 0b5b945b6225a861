//! Job records, inputs and the job field table.

use crate::error::JoblyResult;
use crate::fields::{Field, FieldMap};
use crate::models::company::Company;
use crate::partial_update::Patch;
use crate::row::{FromRow, RowExt};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Updatable job fields. The id and the owning company never change.
pub const JOB_FIELDS: FieldMap = FieldMap::new(
    "job",
    &[
        Field::same("title"),
        Field::same("salary"),
        Field::same("equity"),
    ],
);

pub(crate) const JOB_COLUMNS: &str =
    r#"id, title, salary, equity, company_handle AS "companyHandle""#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("companyHandle")?,
        })
    }
}

/// A job with its owning company in place of the company handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company: Company,
}

impl JobDetail {
    pub fn new(job: Job, company: Company) -> Self {
        Self {
            id: job.id,
            title: job.title,
            salary: job.salary,
            equity: job.equity,
            company,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    pub salary: i32,
    pub equity: Decimal,
    pub company_handle: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

impl From<JobUpdate> for Patch {
    fn from(update: JobUpdate) -> Self {
        Patch::new()
            .set_opt("title", update.title)
            .set_opt("salary", update.salary)
            .set_opt("equity", update.equity)
    }
}
