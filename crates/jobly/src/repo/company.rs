//! Repository for the `companies` table.

use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::filter::CompanyFilter;
use crate::models::company::{COMPANY_COLUMNS, COMPANY_FIELDS, Company, CompanyDetail, NewCompany};
use crate::models::job::{JOB_COLUMNS, Job};
use crate::partial_update::Patch;
use crate::query::{Query, query};

/// CRUD operations for companies.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a company, returning the stored record.
    ///
    /// An existing handle is rejected with [`JoblyError::Duplicate`] before
    /// anything is written.
    pub async fn create(conn: &impl GenericClient, input: &NewCompany) -> JoblyResult<Company> {
        let existing = query("SELECT handle FROM companies WHERE handle = $1")
            .tag("company.create.check")
            .bind(input.handle.clone())
            .fetch_opt(conn)
            .await?;
        if existing.is_some() {
            return Err(JoblyError::duplicate(format!("company: {}", input.handle)));
        }

        let company: Company = query(format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COMPANY_COLUMNS}"
        ))
        .tag("company.create")
        .bind(input.handle.clone())
        .bind(input.name.clone())
        .bind(input.description.clone())
        .bind(input.num_employees)
        .bind(input.logo_url.clone())
        .fetch_one_as(conn)
        .await?;

        tracing::debug!(handle = %company.handle, "created company");
        Ok(company)
    }

    /// All companies matching `filter`.
    pub async fn find_all(
        conn: &impl GenericClient,
        filter: &CompanyFilter,
    ) -> JoblyResult<Vec<Company>> {
        let (sql, params) = super::select_filtered(COMPANY_COLUMNS, "companies", filter)?;
        Query::with_params(sql, params)
            .tag("company.find_all")
            .fetch_all_as(conn)
            .await
    }

    /// One company with its jobs (possibly none).
    pub async fn get(conn: &impl GenericClient, handle: &str) -> JoblyResult<CompanyDetail> {
        let company: Company = query(format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE handle = $1"
        ))
        .tag("company.get")
        .bind(handle.to_string())
        .fetch_opt_as(conn)
        .await?
        .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;

        let jobs: Vec<Job> = query(format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE company_handle = $1 ORDER BY id"
        ))
        .tag("company.get.jobs")
        .bind(handle.to_string())
        .fetch_all_as(conn)
        .await?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Apply a partial update and return the updated record.
    ///
    /// Fields outside [`COMPANY_FIELDS`] fail with [`JoblyError::UnknownField`];
    /// an empty patch fails with [`JoblyError::EmptyInput`].
    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        patch: impl Into<Patch>,
    ) -> JoblyResult<Company> {
        let (sql, params) = super::update_statement(
            "companies",
            "handle",
            handle.to_string(),
            &patch.into(),
            &COMPANY_FIELDS,
            COMPANY_COLUMNS,
        )?;

        Query::with_params(sql, params)
            .tag("company.update")
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))
    }

    /// Delete a company; its jobs go with it.
    pub async fn remove(conn: &impl GenericClient, handle: &str) -> JoblyResult<()> {
        let deleted = query("DELETE FROM companies WHERE handle = $1 RETURNING handle")
            .tag("company.remove")
            .bind(handle.to_string())
            .fetch_opt(conn)
            .await?;
        if deleted.is_none() {
            return Err(JoblyError::not_found(format!("No company: {handle}")));
        }
        tracing::debug!(handle, "removed company");
        Ok(())
    }
}
