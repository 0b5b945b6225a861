//! SQL fragments paired with their bound values.

use crate::param::ParamList;

/// A rendered SQL fragment whose `$n` placeholders index into `params`.
///
/// Both clause builders return a `Clause`. The fragment never carries a leading
/// keyword (`SET`/`WHERE`); the composing statement decides whether to emit one.
#[derive(Clone, Debug, Default)]
pub struct Clause {
    sql: String,
    params: ParamList,
}

impl Clause {
    pub(crate) fn new(sql: String, params: ParamList) -> Self {
        Self { sql, params }
    }

    /// The fragment text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bound values, position-for-position with the fragment's placeholders.
    pub fn params(&self) -> &ParamList {
        &self.params
    }

    /// `true` when no predicate or assignment was produced.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Split into fragment and parameters so the caller can keep appending.
    pub fn into_parts(self) -> (String, ParamList) {
        (self.sql, self.params)
    }
}
