//! Repository for the `jobs` table.

use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::filter::JobFilter;
use crate::models::company::{COMPANY_COLUMNS, Company};
use crate::models::job::{JOB_COLUMNS, JOB_FIELDS, Job, JobDetail, NewJob};
use crate::partial_update::Patch;
use crate::query::{Query, query};

/// CRUD operations for jobs.
pub struct JobRepo;

impl JobRepo {
    /// Insert a job. Titles may repeat, so there is no duplicate check.
    ///
    /// An unknown `companyHandle` is reported as [`JoblyError::NotFound`].
    pub async fn create(conn: &impl GenericClient, input: &NewJob) -> JoblyResult<Job> {
        let job: Job = query(format!(
            "INSERT INTO jobs (title, salary, equity, company_handle)
             VALUES ($1, $2, $3, $4)
             RETURNING {JOB_COLUMNS}"
        ))
        .tag("job.create")
        .bind(input.title.clone())
        .bind(input.salary)
        .bind(input.equity)
        .bind(input.company_handle.clone())
        .fetch_one_as(conn)
        .await
        .map_err(|e| {
            if e.is_foreign_key_violation() {
                JoblyError::not_found(format!("No company: {}", input.company_handle))
            } else {
                e
            }
        })?;

        tracing::debug!(id = job.id, company = %job.company_handle, "created job");
        Ok(job)
    }

    pub async fn find_all(conn: &impl GenericClient, filter: &JobFilter) -> JoblyResult<Vec<Job>> {
        let (sql, params) = super::select_filtered(JOB_COLUMNS, "jobs", filter)?;
        Query::with_params(sql, params)
            .tag("job.find_all")
            .fetch_all_as(conn)
            .await
    }

    /// One job with its owning company attached.
    pub async fn get(conn: &impl GenericClient, id: i32) -> JoblyResult<JobDetail> {
        let job: Job = query(format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .tag("job.get")
            .bind(id)
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job with id: {id}")))?;

        let company: Company = query(format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE handle = $1"
        ))
        .tag("job.get.company")
        .bind(job.company_handle.clone())
        .fetch_one_as(conn)
        .await?;

        Ok(JobDetail::new(job, company))
    }

    /// Apply a partial update to title, salary or equity.
    pub async fn update(
        conn: &impl GenericClient,
        id: i32,
        patch: impl Into<Patch>,
    ) -> JoblyResult<Job> {
        let (sql, params) = super::update_statement(
            "jobs",
            "id",
            id,
            &patch.into(),
            &JOB_FIELDS,
            JOB_COLUMNS,
        )?;

        Query::with_params(sql, params)
            .tag("job.update")
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job with id: {id}")))
    }

    pub async fn remove(conn: &impl GenericClient, id: i32) -> JoblyResult<()> {
        let deleted = query("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .tag("job.remove")
            .bind(id)
            .fetch_opt(conn)
            .await?;
        if deleted.is_none() {
            return Err(JoblyError::not_found(format!("No job with id: {id}")));
        }
        tracing::debug!(id, "removed job");
        Ok(())
    }
}
