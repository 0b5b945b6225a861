//! Repositories: one unit struct per table, associated async functions that
//! borrow a connection for the duration of the call.
//!
//! Every function takes `&impl GenericClient`, so callers decide whether the
//! work runs on a pooled connection or inside their own transaction.

mod company;
mod job;
mod user;

pub use company::CompanyRepo;
pub use job::JobRepo;
pub use user::UserRepo;

use crate::fields::FieldMap;
use crate::filter::Criteria;
use crate::param::ParamList;
use crate::partial_update::{Patch, build_set_clause};
use tokio_postgres::types::ToSql;

/// `SELECT {columns} FROM {table}` followed by the filter's WHERE clause, if any.
fn select_filtered(
    columns: &str,
    table: &str,
    filter: &impl Criteria,
) -> crate::JoblyResult<(String, ParamList)> {
    let (predicates, params) = filter.build_filter()?.into_parts();
    let mut sql = format!("SELECT {columns} FROM {table}");
    if !predicates.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&predicates);
    }
    Ok((sql, params))
}

/// `UPDATE {table} SET ... WHERE {key_column} = $n RETURNING {columns}`.
///
/// Fields outside `fields` are rejected before any SQL is built. The key is
/// pushed after the SET values, so its placeholder is always the last one.
fn update_statement<K>(
    table: &str,
    key_column: &str,
    key: K,
    patch: &Patch,
    fields: &FieldMap,
    columns: &str,
) -> crate::JoblyResult<(String, ParamList)>
where
    K: ToSql + Send + Sync + 'static,
{
    patch.check_fields(fields)?;
    let (set, mut params) = build_set_clause(patch, fields)?.into_parts();
    let key_idx = params.push(key);
    let sql =
        format!("UPDATE {table} SET {set} WHERE {key_column} = ${key_idx} RETURNING {columns}");
    Ok((sql, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{CompanyFilter, JobFilter};
    use crate::models::{COMPANY_FIELDS, JOB_FIELDS, USER_FIELDS};

    #[test]
    fn no_criteria_omits_where() {
        let (sql, params) = select_filtered("id", "jobs", &JobFilter::default()).unwrap();
        assert_eq!(sql, "SELECT id FROM jobs");
        assert!(params.is_empty());
    }

    #[test]
    fn criteria_append_where() {
        let filter = CompanyFilter {
            min_employees: Some(2),
            ..Default::default()
        };
        let (sql, params) = select_filtered("handle", "companies", &filter).unwrap();
        assert_eq!(sql, "SELECT handle FROM companies WHERE num_employees >= $1");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn range_error_surfaces_before_sql() {
        let filter = CompanyFilter {
            min_employees: Some(50),
            max_employees: Some(10),
            ..Default::default()
        };
        let err = select_filtered("handle", "companies", &filter).unwrap_err();
        assert!(matches!(err, crate::JoblyError::Range(_)));
    }

    #[test]
    fn update_key_follows_set_values() {
        let patch = Patch::new()
            .set("name", "New".to_string())
            .set("logoUrl", "http://new.img".to_string());
        let (sql, params) = update_statement(
            "companies",
            "handle",
            "c1".to_string(),
            &patch,
            &COMPANY_FIELDS,
            "handle",
        )
        .unwrap();
        assert_eq!(
            sql,
            r#"UPDATE companies SET "name" = $1, "logo_url" = $2 WHERE handle = $3 RETURNING handle"#
        );
        assert_eq!(params.len(), 3);
        let values: Vec<String> = params.iter().map(|p| format!("{p:?}")).collect();
        assert_eq!(values, vec![r#""New""#, r#""http://new.img""#, r#""c1""#]);
    }

    #[test]
    fn update_single_field_uses_second_placeholder_for_key() {
        let patch = Patch::new().set("title", "Updated".to_string());
        let (sql, params) = update_statement("jobs", "id", 7_i32, &patch, &JOB_FIELDS, "id").unwrap();
        assert_eq!(sql, r#"UPDATE jobs SET "title" = $1 WHERE id = $2 RETURNING id"#);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn update_rejects_before_numbering() {
        let user_update = |patch: &Patch| {
            update_statement("users", "username", "u1".to_string(), patch, &USER_FIELDS, "username")
        };

        let err = user_update(&Patch::new()).unwrap_err();
        assert!(matches!(err, crate::JoblyError::EmptyInput(_)));

        let patch = Patch::new().set("username", "u9".to_string());
        let err = user_update(&patch).unwrap_err();
        assert!(matches!(err, crate::JoblyError::UnknownField { entity: "user", .. }));
    }
}
