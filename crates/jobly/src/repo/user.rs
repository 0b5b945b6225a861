//! Repository for the `users` and `applications` tables.

use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::models::user::{NewUser, USER_COLUMNS, USER_FIELDS, User, UserDetail};
use crate::partial_update::Patch;
use crate::query::{Query, query};

/// Users and their job applications.
pub struct UserRepo;

impl UserRepo {
    /// Register a user. The password in `input` is stored as given.
    pub async fn register(conn: &impl GenericClient, input: &NewUser) -> JoblyResult<User> {
        let existing = query("SELECT username FROM users WHERE username = $1")
            .tag("user.register.check")
            .bind(input.username.clone())
            .fetch_opt(conn)
            .await?;
        if existing.is_some() {
            return Err(JoblyError::duplicate(format!("username: {}", input.username)));
        }

        let user: User = query(format!(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        ))
        .tag("user.register")
        .bind(input.username.clone())
        .bind(input.password.clone())
        .bind(input.first_name.clone())
        .bind(input.last_name.clone())
        .bind(input.email.clone())
        .bind(input.is_admin)
        .fetch_one_as(conn)
        .await?;

        tracing::debug!(username = %user.username, "registered user");
        Ok(user)
    }

    pub async fn find_all(conn: &impl GenericClient) -> JoblyResult<Vec<User>> {
        query(format!("SELECT {USER_COLUMNS} FROM users"))
            .tag("user.find_all")
            .fetch_all_as(conn)
            .await
    }

    /// One user with the ids of jobs applied to, lowest first.
    pub async fn get(conn: &impl GenericClient, username: &str) -> JoblyResult<UserDetail> {
        let user: User = query(format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
            .tag("user.get")
            .bind(username.to_string())
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No user: {username}")))?;

        let applications: Vec<i32> =
            query("SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id")
                .tag("user.get.applications")
                .bind(username.to_string())
                .fetch_all_as(conn)
                .await?;

        Ok(UserDetail { user, applications })
    }

    pub async fn update(
        conn: &impl GenericClient,
        username: &str,
        patch: impl Into<Patch>,
    ) -> JoblyResult<User> {
        let (sql, params) = super::update_statement(
            "users",
            "username",
            username.to_string(),
            &patch.into(),
            &USER_FIELDS,
            USER_COLUMNS,
        )?;

        Query::with_params(sql, params)
            .tag("user.update")
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No user: {username}")))
    }

    pub async fn remove(conn: &impl GenericClient, username: &str) -> JoblyResult<()> {
        let deleted = query("DELETE FROM users WHERE username = $1 RETURNING username")
            .tag("user.remove")
            .bind(username.to_string())
            .fetch_opt(conn)
            .await?;
        if deleted.is_none() {
            return Err(JoblyError::not_found(format!("No user: {username}")));
        }
        tracing::debug!(username, "removed user");
        Ok(())
    }

    /// Record that `username` applied to `job_id`; returns the job id.
    pub async fn apply(conn: &impl GenericClient, username: &str, job_id: i32) -> JoblyResult<i32> {
        let applied: i32 = query(
            "INSERT INTO applications (username, job_id) VALUES ($1, $2) RETURNING job_id",
        )
        .tag("user.apply")
        .bind(username.to_string())
        .bind(job_id)
        .fetch_one_as(conn)
        .await
        .map_err(|e| match e {
            JoblyError::ForeignKeyViolation(detail) if detail.contains("job_id") => {
                JoblyError::not_found(format!("No job with id: {job_id}"))
            }
            JoblyError::ForeignKeyViolation(_) => {
                JoblyError::not_found(format!("No user: {username}"))
            }
            JoblyError::UniqueViolation(_) => {
                JoblyError::duplicate(format!("application: {username} -> {job_id}"))
            }
            other => other,
        })?;

        tracing::debug!(username, job_id, "recorded application");
        Ok(applied)
    }
}
