//! Pre-numbered statements and their execution.

use crate::client::GenericClient;
use crate::error::JoblyResult;
use crate::param::ParamList;
use crate::row::FromRow;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A SQL string with pre-numbered placeholders (`$1, $2, ...`) plus bound parameters.
///
/// Statements composed from a [`Clause`](crate::Clause) hand over the clause's
/// own [`ParamList`] through [`Query::with_params`], after pushing any trailing
/// values onto it.
#[must_use]
pub struct Query {
    sql: String,
    params: ParamList,
    tag: &'static str,
}

impl Query {
    /// Create a new pre-numbered query with no parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: ParamList::new(),
            tag: "-",
        }
    }

    /// Create a query over an existing parameter list.
    pub fn with_params(sql: impl Into<String>, params: ParamList) -> Self {
        Self {
            sql: sql.into(),
            params,
            tag: "-",
        }
    }

    /// Associate a tag used in log events.
    pub fn tag(mut self, tag: &'static str) -> Self {
        self.tag = tag;
        self
    }

    /// Bind a parameter value.
    ///
    /// This does not modify the SQL string; the value becomes `$(n + 1)` where
    /// `n` is the number of values already bound.
    pub fn bind<T>(mut self, value: T) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.params.push(value);
        self
    }

    /// Access the SQL string.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Access the bound parameters.
    pub fn params(&self) -> &ParamList {
        &self.params
    }

    fn log(&self) {
        tracing::debug!(
            target: "jobly.sql",
            tag = self.tag,
            param_count = self.params.len(),
            sql = %self.sql,
        );
    }

    fn log_failure<T>(&self, result: JoblyResult<T>) -> JoblyResult<T> {
        if let Err(err) = &result {
            tracing::warn!(target: "jobly.sql", tag = self.tag, error = %err, "statement failed");
        }
        result
    }

    // ==================== Execution ====================

    /// Execute the query and return all rows.
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> JoblyResult<Vec<Row>> {
        self.log();
        let params = self.params.as_refs();
        self.log_failure(conn.query(&self.sql, &params).await)
    }

    /// Execute the query and return all rows mapped to `T`.
    pub async fn fetch_all_as<T: FromRow>(&self, conn: &impl GenericClient) -> JoblyResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute the query and return the **first** row mapped to `T`.
    ///
    /// An empty result is [`JoblyError::NotFound`](crate::JoblyError::NotFound).
    pub async fn fetch_one_as<T: FromRow>(&self, conn: &impl GenericClient) -> JoblyResult<T> {
        match self.fetch_opt(conn).await? {
            Some(row) => T::from_row(&row),
            None => Err(crate::error::JoblyError::not_found(format!(
                "{} returned no rows",
                self.tag
            ))),
        }
    }

    /// Execute the query and return the first row, if any.
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> JoblyResult<Option<Row>> {
        self.log();
        let params = self.params.as_refs();
        self.log_failure(conn.query_opt(&self.sql, &params).await)
    }

    /// Execute the query and return at most one row mapped to `T`.
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> JoblyResult<Option<T>> {
        let row = self.fetch_opt(conn).await?;
        row.as_ref().map(T::from_row).transpose()
    }
}

/// Build a query from a pre-numbered SQL string (`$1, $2, ...`).
pub fn query(sql: impl Into<String>) -> Query {
    Query::new(sql)
}
