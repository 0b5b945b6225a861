//! Quoted SQL identifiers for storage columns.
//!
//! Column names reach the SET clause from a field mapping table, and unmapped
//! names fall through unchanged. Postgres cannot bind identifiers as
//! parameters, so every column is written as a double-quoted identifier:
//!
//! - the name may contain any character except NUL
//! - an embedded `"` is escaped as `""`
//!
//! # Example
//! ```ignore
//! use jobly::Ident;
//!
//! let c = Ident::new("num_employees")?;
//! assert_eq!(c.to_sql(), r#""num_employees""#);
//! # Ok::<(), jobly::JoblyError>(())
//! ```

use crate::error::{JoblyError, JoblyResult};

/// A single storage column rendered as a quoted identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    name: String,
}

impl Ident {
    /// Validate a column name.
    pub fn new(name: &str) -> JoblyResult<Self> {
        if name.is_empty() {
            return Err(JoblyError::InvalidIdentifier(
                "identifier cannot be empty".to_string(),
            ));
        }
        if name.contains('\0') {
            return Err(JoblyError::InvalidIdentifier(
                "identifier cannot contain NUL character".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
        })
    }

    /// The raw (unquoted) column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        let mut out = String::with_capacity(self.name.len() + 2);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push('"');
        for ch in self.name.chars() {
            if ch == '"' {
                out.push_str("\"\"");
            } else {
                out.push(ch);
            }
        }
        out.push('"');
    }
}
