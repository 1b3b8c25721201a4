//! Field-Spec: the field names one composition layer declares.

use serde::{Deserialize, Serialize};

use crate::compose::compose;

/// Whether a layer's fields may be reassigned after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
    /// Instances freeze right after construction.
    #[default]
    Immutable,
    /// Instances stay writable and the layer's fields get writers.
    Mutable,
}

/// Ordered, unique field names plus a mutability mode.
///
/// Repeated names are collapsed to their first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    fields: Vec<String>,
    mutability: Mutability,
}

impl FieldSpec {
    /// Immutable spec over `fields`.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let declared: Vec<String> = fields.into_iter().map(Into::into).collect();
        Self {
            fields: compose(&declared, &[]),
            mutability: Mutability::Immutable,
        }
    }

    /// Mutable spec over `fields`.
    pub fn mutable<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(fields).with_mutability(Mutability::Mutable)
    }

    pub fn with_mutability(mut self, mutability: Mutability) -> Self {
        self.mutability = mutability;
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    pub fn is_mutable(&self) -> bool {
        self.mutability == Mutability::Mutable
    }
}
