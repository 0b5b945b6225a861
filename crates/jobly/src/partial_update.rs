//! Partial-update SET clause builder.
//!
//! A [`Patch`] is an ordered list of `(external field, value)` pairs. Building it
//! against a [`FieldMap`] yields `"col_a" = $1, "col_b" = $2, ...` and a parameter
//! list in the same order.
//!
//! # Example
//!
//! ```ignore
//! use jobly::{Patch, build_set_clause, models::company::COMPANY_FIELDS};
//!
//! let patch = Patch::new().set("numEmployees", 10_i32).set("logoUrl", "http://c1.img");
//! let set = build_set_clause(&patch, &COMPANY_FIELDS)?;
//! assert_eq!(set.sql(), r#""num_employees" = $1, "logo_url" = $2"#);
//! ```

use crate::clause::Clause;
use crate::error::{JoblyError, JoblyResult};
use crate::fields::FieldMap;
use crate::ident::Ident;
use crate::param::{Param, ParamList};
use tokio_postgres::types::ToSql;

/// Ordered field assignments for a partial update.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct Patch {
    entries: Vec<(String, Param)>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to `field` (consuming form).
    pub fn set<T: ToSql + Send + Sync + 'static>(mut self, field: &str, value: T) -> Self {
        self.push(field, value);
        self
    }

    /// Assign `value` to `field` when present; `None` leaves the patch unchanged.
    pub fn set_opt<T: ToSql + Send + Sync + 'static>(self, field: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.set(field, v),
            None => self,
        }
    }

    /// Assign `value` to `field`.
    ///
    /// Naming a field twice replaces the earlier value in place, so every field
    /// still appears once in the SET clause.
    pub fn push<T: ToSql + Send + Sync + 'static>(&mut self, field: &str, value: T) -> &mut Self {
        let param = Param::new(value);
        match self.entries.iter_mut().find(|(name, _)| name == field) {
            Some(slot) => slot.1 = param,
            None => self.entries.push((field.to_string(), param)),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field names in assignment order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Reject fields that `table` does not declare.
    pub fn check_fields(&self, table: &FieldMap) -> JoblyResult<()> {
        for field in self.fields() {
            table.resolve(field)?;
        }
        Ok(())
    }
}

/// Build the SET fragment for `updates`, mapping names through `table`.
///
/// Fails with [`JoblyError::EmptyInput`] when `updates` is empty. Names missing
/// from `table` are used as column names unchanged; repositories call
/// [`Patch::check_fields`] first when that is not acceptable.
pub fn build_set_clause(updates: &Patch, table: &FieldMap) -> JoblyResult<Clause> {
    if updates.is_empty() {
        return Err(JoblyError::EmptyInput(format!(
            "update for {} names no fields",
            table.entity()
        )));
    }

    let mut params = ParamList::new();
    let mut sql = String::new();

    for (i, (field, value)) in updates.entries.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        Ident::new(table.map_field(field))?.write_sql(&mut sql);
        let idx = params.push_param(value.clone());
        sql.push_str(" = $");
        sql.push_str(&idx.to_string());
    }

    Ok(Clause::new(sql, params))
}
