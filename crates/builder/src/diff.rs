//! Field-by-field differences between value objects.

use indexmap::IndexMap;
use serde::Serialize;

use wholeable_core::{Value, ValueObject};

/// One differing field: `old` from the receiver, `new` from the other side.
///
/// `new` is `None` when the other side is of a foreign type and the
/// comparison is vacuous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub old: Value,
    pub new: Option<Value>,
}

impl Change {
    pub fn new(old: Value, new: Option<Value>) -> Self {
        Self { old, new }
    }
}

/// Differing fields keyed by name, in canonical field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diff {
    changes: IndexMap<String, Change>,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn get(&self, field: &str) -> Option<&Change> {
        self.changes.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.changes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Change)> {
        self.changes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_inner(self) -> IndexMap<String, Change> {
        self.changes
    }
}

impl FromIterator<(String, Change)> for Diff {
    fn from_iter<T: IntoIterator<Item = (String, Change)>>(iter: T) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

/// Fields of `this` whose value differs on `other`. `other` must carry every
/// field of `this` (same type or a descendant); fields it lacks are skipped.
pub(crate) fn changed_fields<A, B>(this: &A, other: &B) -> Diff
where
    A: ValueObject + ?Sized,
    B: ValueObject + ?Sized,
{
    this.members()
        .iter()
        .filter_map(|field| {
            let mine = this.get(field)?;
            let theirs = other.get(field)?;
            (mine != theirs).then(|| (field.clone(), Change::new(mine.clone(), Some(theirs.clone()))))
        })
        .collect()
}

/// Every field of `this` mapped to `[value, absent]`.
pub(crate) fn foreign<A: ValueObject + ?Sized>(this: &A) -> Diff {
    this.to_h()
        .into_iter()
        .map(|(field, value)| (field, Change::new(value, None)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_pairs_by_field() {
        let diff: Diff = [("y".to_string(), Change::new(Value::Int(2), Some(Value::Int(3))))]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&diff).unwrap();
        assert_eq!(json, serde_json::json!({"y": {"old": 2, "new": 3}}));
    }

    #[test]
    fn absent_side_serializes_as_null() {
        let diff: Diff = [("name".to_string(), Change::new(Value::from("test"), None))]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&diff).unwrap();
        assert_eq!(json, serde_json::json!({"name": {"old": "test", "new": null}}));
    }
}
