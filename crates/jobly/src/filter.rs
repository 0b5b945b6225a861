//! Conjunctive WHERE clause builders for entity searches.
//!
//! Each search criterion is either absent or a [`Predicate`] carrying its bound
//! value. [`build_where`] folds the present ones, in order, into
//! `p1 AND p2 AND ...` with placeholders numbered as values are appended.
//! An all-absent input produces an empty clause, and the caller then omits
//! `WHERE` entirely.
//!
//! # Example
//! ```ignore
//! use jobly::{Criteria, JobFilter};
//!
//! let filter = JobFilter { min_salary: Some(150), has_equity: true, ..Default::default() };
//! let clause = filter.build_filter()?;
//! assert_eq!(clause.sql(), "salary >= $1 AND equity > 0");
//! ```

use crate::clause::Clause;
use crate::error::{JoblyError, JoblyResult};
use crate::param::{Param, ParamList};
use serde::Deserialize;
use tokio_postgres::types::ToSql;

/// Comparison applied by a [`Predicate`].
#[derive(Debug, Clone)]
pub enum Op {
    /// column >= value
    Gte(Param),
    /// column <= value
    Lte(Param),
    /// Case-insensitive substring: column ILIKE '%' || value || '%'
    Contains(String),
    /// column > 0 (no bound value)
    Positive,
}

/// One predicate over a fixed storage column.
#[derive(Debug, Clone)]
pub struct Predicate {
    column: &'static str,
    op: Op,
}

impl Predicate {
    pub fn gte<T: ToSql + Send + Sync + 'static>(column: &'static str, value: T) -> Self {
        Self {
            column,
            op: Op::Gte(Param::new(value)),
        }
    }

    pub fn lte<T: ToSql + Send + Sync + 'static>(column: &'static str, value: T) -> Self {
        Self {
            column,
            op: Op::Lte(Param::new(value)),
        }
    }

    pub fn contains(column: &'static str, text: impl Into<String>) -> Self {
        Self {
            column,
            op: Op::Contains(text.into()),
        }
    }

    pub fn positive(column: &'static str) -> Self {
        Self {
            column,
            op: Op::Positive,
        }
    }

    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn op(&self) -> &Op {
        &self.op
    }

    fn write(&self, sql: &mut String, params: &mut ParamList) {
        sql.push_str(self.column);
        match &self.op {
            Op::Gte(value) => {
                let idx = params.push_param(value.clone());
                sql.push_str(&format!(" >= ${idx}"));
            }
            Op::Lte(value) => {
                let idx = params.push_param(value.clone());
                sql.push_str(&format!(" <= ${idx}"));
            }
            Op::Contains(text) => {
                // Wildcards go into the bound value, never into the SQL text.
                let idx = params.push(format!("%{text}%"));
                sql.push_str(&format!(" ILIKE ${idx}"));
            }
            Op::Positive => sql.push_str(" > 0"),
        }
    }
}

/// Fold the present predicates into an AND-joined clause.
pub fn build_where(predicates: impl IntoIterator<Item = Option<Predicate>>) -> Clause {
    let mut sql = String::new();
    let mut params = ParamList::new();

    for predicate in predicates.into_iter().flatten() {
        if !sql.is_empty() {
            sql.push_str(" AND ");
        }
        predicate.write(&mut sql, &mut params);
    }

    Clause::new(sql, params)
}

/// Search criteria for one entity.
pub trait Criteria {
    /// Reject contradictory criteria before anything is built.
    fn validate(&self) -> JoblyResult<()> {
        Ok(())
    }

    /// Every potential predicate in a fixed order, `None` when not requested.
    fn predicates(&self) -> Vec<Option<Predicate>>;

    /// Validate, then build the WHERE fragment (without the keyword).
    fn build_filter(&self) -> JoblyResult<Clause> {
        self.validate()?;
        Ok(build_where(self.predicates()))
    }
}

/// Company search criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyFilter {
    /// Inclusive lower bound on `num_employees`.
    pub min_employees: Option<i32>,
    /// Inclusive upper bound on `num_employees`.
    pub max_employees: Option<i32>,
    /// Case-insensitive substring of `name`.
    #[serde(alias = "name")]
    pub name_contains: Option<String>,
}

impl Criteria for CompanyFilter {
    fn validate(&self) -> JoblyResult<()> {
        if let (Some(min), Some(max)) = (self.min_employees, self.max_employees) {
            if min > max {
                return Err(JoblyError::Range(format!(
                    "minEmployees ({min}) must not exceed maxEmployees ({max})"
                )));
            }
        }
        Ok(())
    }

    fn predicates(&self) -> Vec<Option<Predicate>> {
        vec![
            self.min_employees
                .map(|min| Predicate::gte("num_employees", min)),
            self.max_employees
                .map(|max| Predicate::lte("num_employees", max)),
            self.name_contains
                .as_deref()
                .map(|name| Predicate::contains("name", name)),
        ]
    }
}

/// Job search criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilter {
    /// Case-insensitive substring of `title`.
    #[serde(alias = "title")]
    pub title_contains: Option<String>,
    /// Inclusive lower bound on `salary`.
    pub min_salary: Option<i32>,
    /// Only jobs with equity above zero. `false` applies no equity predicate.
    #[serde(default)]
    pub has_equity: bool,
}

impl Criteria for JobFilter {
    fn predicates(&self) -> Vec<Option<Predicate>> {
        vec![
            self.title_contains
                .as_deref()
                .map(|title| Predicate::contains("title", title)),
            self.min_salary.map(|min| Predicate::gte("salary", min)),
            self.has_equity.then(|| Predicate::positive("equity")),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(clause: &Clause) -> Vec<String> {
        clause.params().iter().map(|p| format!("{p:?}")).collect()
    }

    fn predicate_count(clause: &Clause) -> usize {
        if clause.is_empty() {
            0
        } else {
            clause.sql().split(" AND ").count()
        }
    }

    #[test]
    fn empty_company_filter_builds_nothing() {
        let clause = CompanyFilter::default().build_filter().unwrap();
        assert!(clause.is_empty());
        assert!(clause.params().is_empty());
    }

    #[test]
    fn empty_job_filter_builds_nothing() {
        let clause = JobFilter::default().build_filter().unwrap();
        assert_eq!(clause.sql(), "");
        assert!(clause.params().is_empty());
    }

    #[test]
    fn company_filter_all_criteria() {
        let filter = CompanyFilter {
            min_employees: Some(1),
            max_employees: Some(300),
            name_contains: Some("net".to_string()),
        };
        let clause = filter.build_filter().unwrap();
        assert_eq!(
            clause.sql(),
            "num_employees >= $1 AND num_employees <= $2 AND name ILIKE $3"
        );
        assert_eq!(values(&clause), vec!["1", "300", r#""%net%""#]);
    }

    #[test]
    fn company_filter_numbers_only_present_criteria() {
        let filter = CompanyFilter {
            max_employees: Some(2),
            name_contains: Some("c".to_string()),
            ..Default::default()
        };
        let clause = filter.build_filter().unwrap();
        assert_eq!(clause.sql(), "num_employees <= $1 AND name ILIKE $2");
        assert_eq!(values(&clause), vec!["2", r#""%c%""#]);
    }

    #[test]
    fn company_filter_equal_bounds_are_allowed() {
        let filter = CompanyFilter {
            min_employees: Some(10),
            max_employees: Some(10),
            ..Default::default()
        };
        assert_eq!(predicate_count(&filter.build_filter().unwrap()), 2);
    }

    #[test]
    fn company_filter_min_above_max_is_a_range_error() {
        let filter = CompanyFilter {
            min_employees: Some(50),
            max_employees: Some(10),
            ..Default::default()
        };
        assert!(matches!(filter.build_filter(), Err(JoblyError::Range(_))));
    }

    #[test]
    fn job_filter_has_equity_adds_unbound_predicate() {
        let filter = JobFilter {
            min_salary: Some(150),
            has_equity: true,
            ..Default::default()
        };
        let clause = filter.build_filter().unwrap();
        assert_eq!(clause.sql(), "salary >= $1 AND equity > 0");
        assert_eq!(values(&clause), vec!["150"]);
    }

    #[test]
    fn job_filter_has_equity_false_adds_nothing() {
        let filter = JobFilter {
            has_equity: false,
            ..Default::default()
        };
        assert!(filter.build_filter().unwrap().is_empty());
    }

    #[test]
    fn job_filter_placeholders_follow_bound_values() {
        let filter = JobFilter {
            title_contains: Some("eng".to_string()),
            min_salary: Some(20),
            has_equity: true,
        };
        let clause = filter.build_filter().unwrap();
        assert_eq!(clause.sql(), "title ILIKE $1 AND salary >= $2 AND equity > 0");
        assert_eq!(values(&clause), vec![r#""%eng%""#, "20"]);
    }

    #[test]
    fn predicate_count_matches_present_criteria() {
        for title in [None, Some("t")] {
            for min_salary in [None, Some(5)] {
                for has_equity in [false, true] {
                    let filter = JobFilter {
                        title_contains: title.map(str::to_string),
                        min_salary,
                        has_equity,
                    };
                    let expected = usize::from(title.is_some())
                        + usize::from(min_salary.is_some())
                        + usize::from(has_equity);
                    let clause = filter.build_filter().unwrap();
                    assert_eq!(predicate_count(&clause), expected);
                }
            }
        }
    }

    #[test]
    fn empty_name_still_counts_as_a_criterion() {
        let filter = CompanyFilter {
            name_contains: Some(String::new()),
            ..Default::default()
        };
        let predicates: Vec<Predicate> = filter.predicates().into_iter().flatten().collect();
        assert_eq!(predicates.len(), 1);
        assert_eq!(predicates[0].column(), "name");
        assert!(matches!(predicates[0].op(), Op::Contains(text) if text.is_empty()));

        let clause = filter.build_filter().unwrap();
        assert_eq!(predicate_count(&clause), 1);
        assert_eq!(clause.sql(), "name ILIKE $1");
        assert_eq!(values(&clause), vec![r#""%%""#]);
    }

    #[test]
    fn substring_value_is_bound_not_inlined() {
        let filter = CompanyFilter {
            name_contains: Some("'; DROP TABLE companies; --".to_string()),
            ..Default::default()
        };
        let clause = filter.build_filter().unwrap();
        assert_eq!(clause.sql(), "name ILIKE $1");
        assert!(!clause.sql().contains("DROP"));
    }

    #[test]
    fn filters_deserialize_from_query_names() {
        let company: CompanyFilter =
            serde_json::from_str(r#"{"minEmployees": 2, "name": "net"}"#).unwrap();
        assert_eq!(company.min_employees, Some(2));
        assert_eq!(company.name_contains.as_deref(), Some("net"));

        let job: JobFilter = serde_json::from_str(r#"{"titleContains": "j", "hasEquity": true}"#).unwrap();
        assert_eq!(job.title_contains.as_deref(), Some("j"));
        assert!(job.has_equity);

        assert!(serde_json::from_str::<JobFilter>(r#"{"maxSalary": 1}"#).is_err());
    }
}
