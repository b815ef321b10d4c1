//! Column registry used to resolve free-form field names at runtime.
//!
//! Callers of [`crate::GenericDao::get_by_column_equal`] name a field by
//! string. Each entity implements [`MappedEntity`] so the name can be
//! resolved to a typed column, either directly (`procedure_code`,
//! `procedureCode`) or through a relationship alias (`patient`).

use std::str::FromStr;

use model::entities::{patient, patient_procedure, role, user};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::ColumnType;
use tracing::debug;

use crate::error::{DaoError, Result};

/// Broad type family of a column or a filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Float,
    Text,
    Boolean,
    Date,
    DateTime,
    Time,
    /// Anything not checked here is left for the store to judge.
    Other,
}

impl ValueKind {
    pub fn of_column(column_type: &ColumnType) -> Self {
        match column_type {
            ColumnType::TinyInteger
            | ColumnType::SmallInteger
            | ColumnType::Integer
            | ColumnType::BigInteger
            | ColumnType::TinyUnsigned
            | ColumnType::SmallUnsigned
            | ColumnType::Unsigned
            | ColumnType::BigUnsigned => ValueKind::Integer,
            ColumnType::Float | ColumnType::Double => ValueKind::Float,
            ColumnType::Char(_) | ColumnType::String(_) | ColumnType::Text => ValueKind::Text,
            ColumnType::Boolean => ValueKind::Boolean,
            ColumnType::Date => ValueKind::Date,
            ColumnType::DateTime | ColumnType::Timestamp | ColumnType::TimestampWithTimeZone => {
                ValueKind::DateTime
            }
            ColumnType::Time => ValueKind::Time,
            _ => ValueKind::Other,
        }
    }

    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::TinyInt(_)
            | Value::SmallInt(_)
            | Value::Int(_)
            | Value::BigInt(_)
            | Value::TinyUnsigned(_)
            | Value::SmallUnsigned(_)
            | Value::Unsigned(_)
            | Value::BigUnsigned(_) => ValueKind::Integer,
            Value::Float(_) | Value::Double(_) => ValueKind::Float,
            Value::String(_) | Value::Char(_) => ValueKind::Text,
            Value::Bool(_) => ValueKind::Boolean,
            Value::ChronoDate(_) => ValueKind::Date,
            Value::ChronoDateTime(_)
            | Value::ChronoDateTimeUtc(_)
            | Value::ChronoDateTimeLocal(_)
            | Value::ChronoDateTimeWithTimeZone(_) => ValueKind::DateTime,
            Value::ChronoTime(_) => ValueKind::Time,
            _ => ValueKind::Other,
        }
    }

    fn accepts(self, value: ValueKind) -> bool {
        match (self, value) {
            (ValueKind::Other, _) | (_, ValueKind::Other) => true,
            // Integers widen into float columns
            (ValueKind::Float, ValueKind::Integer) => true,
            (expected, actual) => expected == actual,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ValueKind::Integer => "integer",
            ValueKind::Float => "floating point",
            ValueKind::Text => "text",
            ValueKind::Boolean => "boolean",
            ValueKind::Date => "date",
            ValueKind::DateTime => "timestamp",
            ValueKind::Time => "time",
            ValueKind::Other => "compatible",
        }
    }
}

/// An entity whose columns can be looked up by name.
pub trait MappedEntity: EntityTrait {
    /// Property names that map onto a differently named column,
    /// typically a relationship name onto its foreign key.
    fn column_aliases() -> &'static [(&'static str, Self::Column)] {
        &[]
    }

    /// Table name used in logs and error messages.
    fn entity_name() -> String {
        Self::default().table_name().to_string()
    }

    /// Resolves `name` to a column: aliases first, then the column name
    /// itself in snake_case or camelCase.
    fn resolve_column(name: &str) -> Result<Self::Column> {
        let name = name.trim();
        if let Some((_, column)) = Self::column_aliases()
            .iter()
            .find(|(alias, _)| *alias == name)
        {
            debug!("Resolved alias '{}' on {}", name, Self::entity_name());
            return Ok(*column);
        }

        Self::Column::from_str(&to_snake_case(name)).map_err(|_| DaoError::UnknownColumn {
            entity: Self::entity_name(),
            column: name.to_string(),
        })
    }

    /// Fails with [`DaoError::TypeMismatch`] when `value` cannot be compared
    /// against `column`.
    fn check_value(column: Self::Column, value: &Value) -> Result<()> {
        let expected = ValueKind::of_column(column.def().get_column_type());
        if expected.accepts(ValueKind::of_value(value)) {
            Ok(())
        } else {
            Err(type_mismatch::<Self>(column, expected))
        }
    }

    /// Fails unless `column` holds text.
    fn check_text(column: Self::Column) -> Result<()> {
        let expected = ValueKind::of_column(column.def().get_column_type());
        match expected {
            ValueKind::Text => Ok(()),
            _ => Err(type_mismatch::<Self>(column, ValueKind::Text)),
        }
    }
}

fn type_mismatch<E: MappedEntity>(column: E::Column, expected: ValueKind) -> DaoError {
    DaoError::TypeMismatch {
        entity: E::entity_name(),
        column: column.as_str().to_string(),
        expected: expected.label().to_string(),
    }
}

/// `procedureCode` -> `procedure_code`; snake_case input is returned as-is.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

impl MappedEntity for user::Entity {}

impl MappedEntity for role::Entity {
    fn column_aliases() -> &'static [(&'static str, role::Column)] {
        &[("user", role::Column::UserId)]
    }
}

impl MappedEntity for patient::Entity {}

impl MappedEntity for patient_procedure::Entity {
    fn column_aliases() -> &'static [(&'static str, patient_procedure::Column)] {
        &[("patient", patient_procedure::Column::PatientId)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("procedureCode"), "procedure_code");
        assert_eq!(to_snake_case("procedure_code"), "procedure_code");
        assert_eq!(to_snake_case("id"), "id");
        assert_eq!(to_snake_case("dateOfBirth"), "date_of_birth");
    }

    fn resolved<E: MappedEntity>(name: &str) -> String {
        E::resolve_column(name).unwrap().as_str().to_string()
    }

    #[test]
    fn test_resolve_column_by_name() {
        assert_eq!(resolved::<patient_procedure::Entity>("procedure_code"), "procedure_code");
        assert_eq!(resolved::<patient_procedure::Entity>("procedureCode"), "procedure_code");
        assert_eq!(resolved::<patient::Entity>("last_name"), "last_name");
    }

    #[test]
    fn test_resolve_relationship_alias() {
        assert_eq!(resolved::<patient_procedure::Entity>("patient"), "patient_id");
        assert_eq!(resolved::<role::Entity>("user"), "user_id");
        // The alias belongs to role only
        assert!(patient::Entity::resolve_column("user").is_err());
    }

    #[test]
    fn test_resolve_unknown_column() {
        let err = patient_procedure::Entity::resolve_column("surgeon").unwrap_err();
        match err {
            DaoError::UnknownColumn { entity, column } => {
                assert_eq!(entity, "patient_procedure");
                assert_eq!(column, "surgeon");
            }
            other => panic!("Expected UnknownColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_check_value_types() {
        let code = patient_procedure::Column::ProcedureCode;
        assert!(patient_procedure::Entity::check_value(code, &Value::from(97001)).is_ok());
        assert!(patient_procedure::Entity::check_value(code, &Value::Int(None)).is_ok());

        let err = patient_procedure::Entity::check_value(code, &Value::from("97001")).unwrap_err();
        assert!(matches!(err, DaoError::TypeMismatch { ref expected, .. } if expected == "integer"));

        let gender = patient::Column::Gender;
        assert!(patient::Entity::check_value(gender, &Value::from("F")).is_ok());
        assert!(patient::Entity::check_value(gender, &Value::from(1)).is_err());
    }

    #[test]
    fn test_check_text() {
        assert!(patient::Entity::check_text(patient::Column::LastName).is_ok());
        assert!(patient::Entity::check_text(patient::Column::DateOfBirth).is_err());
    }
}
