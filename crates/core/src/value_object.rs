//! Value object trait: equality by value, not identity.
//!
//! Value objects are defined entirely by their attribute values, read through
//! an ordered list of field names (the canonical field list). Two value
//! objects of the same type with the same values are interchangeable.

use core::hash::{Hash, Hasher};
use std::collections::hash_map::DefaultHasher;

use indexmap::IndexMap;

use crate::id::TypeId;
use crate::value::{Record, Value};

/// The behavior bundle shared by every value object.
///
/// Implementors supply type identity, the canonical field list and a field
/// reader. Everything else is derived from those, so the structural views
/// (`to_a`, `to_h`, their pattern-destructuring aliases, the structural hash
/// and the description) can never disagree with each other.
///
/// ```ignore
/// let point = registry.construct(point_type, [("x", 1), ("y", 2)])?;
/// assert_eq!(point.to_a(), vec![Value::Int(1), Value::Int(2)]);
/// assert_eq!(point.describe(), "Point(x=1, y=2)");
/// ```
pub trait ValueObject {
    /// Identity of the concrete type.
    fn value_type_id(&self) -> TypeId;

    /// Display name of the concrete type.
    fn type_name(&self) -> &str;

    /// Canonical field list, in declaration order.
    fn members(&self) -> &[String];

    /// Reads one field. `None` for names outside [`members`](Self::members).
    fn get(&self, field: &str) -> Option<&Value>;

    /// Field values in canonical order.
    fn to_a(&self) -> Vec<Value> {
        self.members()
            .iter()
            .map(|field| self.get(field).cloned().unwrap_or_default())
            .collect()
    }

    /// Field name to value, in canonical order.
    fn to_h(&self) -> IndexMap<String, Value> {
        self.members()
            .iter()
            .map(|field| (field.clone(), self.get(field).cloned().unwrap_or_default()))
            .collect()
    }

    /// Positional destructuring; always identical to [`to_a`](Self::to_a).
    fn deconstruct(&self) -> Vec<Value> {
        self.to_a()
    }

    /// Keyed destructuring; always identical to [`to_h`](Self::to_h).
    fn deconstruct_keys(&self) -> IndexMap<String, Value> {
        self.to_h()
    }

    /// Hash of the type identity followed by every field value in canonical
    /// order.
    fn structural_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.value_type_id().hash(&mut hasher);
        for field in self.members() {
            match self.get(field) {
                Some(value) => value.hash(&mut hasher),
                None => Value::Nil.hash(&mut hasher),
            }
        }
        hasher.finish()
    }

    /// `TypeName(field1=value1, field2=value2)`.
    fn describe(&self) -> String {
        let pairs = self
            .members()
            .iter()
            .map(|field| match self.get(field) {
                Some(value) => format!("{field}={value}"),
                None => format!("{field}=nil"),
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({pairs})", self.type_name())
    }

    /// Snapshot suitable for storing in another value object's field.
    fn to_record(&self) -> Record {
        Record::new(
            self.value_type_id(),
            self.type_name(),
            self.members().to_vec(),
            self.to_a(),
        )
    }
}
