//! Field mapping between caller-facing names and storage columns.
//!
//! Records use camelCase names externally (`numEmployees`) while the tables use
//! snake_case columns (`num_employees`). A [`FieldMap`] is the one place where
//! the two meet for an entity, and it doubles as the closed set of fields a
//! partial update may touch.

use crate::error::{JoblyError, JoblyResult};

/// One external field and the column that stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub column: &'static str,
}

impl Field {
    /// A field whose column has a different name.
    pub const fn renamed(name: &'static str, column: &'static str) -> Self {
        Self { name, column }
    }

    /// A field stored under its own name.
    pub const fn same(name: &'static str) -> Self {
        Self { name, column: name }
    }
}

/// The fixed field mapping table for one entity.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    entity: &'static str,
    fields: &'static [Field],
}

impl FieldMap {
    pub const fn new(entity: &'static str, fields: &'static [Field]) -> Self {
        Self { entity, fields }
    }

    /// Entity name used in error messages.
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// All declared fields, in declaration order.
    pub fn fields(&self) -> &'static [Field] {
        self.fields
    }

    /// Whether `name` is one of the declared fields.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Translate `name` to its column; names not in the table map to themselves.
    pub fn map_field<'a>(&self, name: &'a str) -> &'a str {
        self.lookup(name).unwrap_or(name)
    }

    /// Translate `name` to its column, rejecting names outside the table.
    pub fn resolve(&self, name: &str) -> JoblyResult<&'static str> {
        self.lookup(name).ok_or_else(|| JoblyError::UnknownField {
            entity: self.entity,
            field: name.to_string(),
        })
    }

    fn lookup(&self, name: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.column)
    }
}

/// Translate a caller-facing field name into a storage column name.
///
/// Total: unknown names come back unchanged.
pub fn map_field<'a>(name: &'a str, table: &FieldMap) -> &'a str {
    table.map_field(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: FieldMap = FieldMap::new(
        "company",
        &[
            Field::same("name"),
            Field::renamed("numEmployees", "num_employees"),
            Field::renamed("logoUrl", "logo_url"),
        ],
    );

    #[test]
    fn maps_renamed_fields() {
        assert_eq!(map_field("numEmployees", &TABLE), "num_employees");
        assert_eq!(map_field("logoUrl", &TABLE), "logo_url");
    }

    #[test]
    fn every_declared_field_maps_through_the_table() {
        assert_eq!(TABLE.fields().len(), 3);
        for field in TABLE.fields() {
            assert!(TABLE.contains(field.name));
            assert_eq!(map_field(field.name, &TABLE), field.column);
        }
    }

    #[test]
    fn same_name_fields_map_to_themselves() {
        assert_eq!(map_field("name", &TABLE), "name");
    }

    #[test]
    fn unknown_fields_fall_back_to_identity() {
        assert_eq!(map_field("age", &TABLE), "age");
        assert_eq!(map_field("", &TABLE), "");
        assert!(!TABLE.contains("age"));
    }

    #[test]
    fn resolve_rejects_unknown_fields() {
        assert_eq!(TABLE.resolve("logoUrl").unwrap(), "logo_url");
        let err = TABLE.resolve("handle").unwrap_err();
        assert!(matches!(
            err,
            JoblyError::UnknownField { entity: "company", ref field } if field == "handle"
        ));
    }

    #[test]
    fn lookup_is_exact_not_case_folded() {
        assert_eq!(map_field("NumEmployees", &TABLE), "NumEmployees");
    }
}
