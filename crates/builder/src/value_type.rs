//! Value type metadata: the result of composing every layer of a type.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use wholeable_core::{TypeId, Value, WholeError, WholeResult};

use crate::compose::compose;
use crate::field_spec::{FieldSpec, Mutability};
use crate::whole::Whole;

/// Declaration of a value type, handed to
/// [`TypeRegistry::define`](crate::TypeRegistry::define).
///
/// Specs are applied in `include` order, each composed onto the list the
/// previous one produced, starting from the parent's canonical list.
#[derive(Debug, Clone, Default)]
pub struct TypeDecl {
    name: Option<String>,
    parent: Option<TypeId>,
    specs: Vec<FieldSpec>,
    defaults: IndexMap<String, Value>,
}

impl TypeDecl {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A type without a name; it displays as `#<Whole:0x...>`.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn extends(mut self, parent: TypeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn include(mut self, spec: FieldSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Value used when construction does not supply `field`.
    pub fn default_value(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(field.into(), value.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<TypeId> {
        self.parent
    }
}

/// A registered value type.
///
/// Immutable once built: the canonical field list, writable set and
/// governing mutability never change afterwards. Instances share it through
/// an `Arc`.
#[derive(Debug)]
pub struct ValueType {
    id: TypeId,
    name: Option<String>,
    display_name: String,
    /// This type first, then each ancestor up to the root.
    lineage: Vec<TypeId>,
    members: Vec<String>,
    writable: IndexSet<String>,
    mutability: Mutability,
    defaults: IndexMap<String, Value>,
}

impl ValueType {
    /// Composes `decl` on top of `parent`.
    ///
    /// - members: parent's list, then each spec composed in order;
    /// - writable: parent's writable fields plus every field of a mutable spec;
    /// - mutability: the mode of the last spec applied here, else the parent's.
    pub(crate) fn compose(decl: TypeDecl, parent: Option<&ValueType>) -> WholeResult<Self> {
        let id = TypeId::new();
        let display_name = decl.name.clone().unwrap_or_else(|| id.anonymous_name());

        let mut lineage = vec![id];
        let mut members = Vec::new();
        let mut writable = IndexSet::new();
        let mut mutability = Mutability::default();
        let mut defaults = IndexMap::new();
        if let Some(parent) = parent {
            lineage.extend(parent.lineage.iter().copied());
            members = parent.members.clone();
            writable = parent.writable.clone();
            mutability = parent.mutability;
            defaults = parent.defaults.clone();
        }

        for spec in &decl.specs {
            members = compose(spec.fields(), &members);
            if spec.is_mutable() {
                writable.extend(spec.fields().iter().cloned());
            }
            mutability = spec.mutability();
        }

        for (field, value) in decl.defaults {
            if !members.contains(&field) {
                return Err(WholeError::unknown_field(display_name, field));
            }
            defaults.insert(field, value);
        }

        debug!(
            type_name = %display_name,
            members = ?members,
            mutability = ?mutability,
            "composed value type"
        );

        Ok(Self {
            id,
            name: decl.name,
            display_name,
            lineage,
            members,
            writable,
            mutability,
            defaults,
        })
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Registered name, `None` for anonymous types.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Canonical field list.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// The mode that decides whether instances freeze.
    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    pub fn is_writable(&self, field: &str) -> bool {
        self.writable.contains(field)
    }

    pub fn writable_fields(&self) -> impl Iterator<Item = &str> {
        self.writable.iter().map(String::as_str)
    }

    /// True for this type itself and for any type derived from `ancestor`.
    pub fn descends_from(&self, ancestor: TypeId) -> bool {
        self.lineage.contains(&ancestor)
    }

    pub fn parent_id(&self) -> Option<TypeId> {
        self.lineage.get(1).copied()
    }

    pub fn defaults(&self) -> &IndexMap<String, Value> {
        &self.defaults
    }

    pub(crate) fn position(&self, field: &str) -> Option<usize> {
        self.members.iter().position(|m| m == field)
    }

    /// Builds an instance from `values` laid over the type's defaults.
    pub fn construct<I, K, V>(self: &Arc<Self>, values: I) -> WholeResult<Whole>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let values = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<IndexMap<String, Value>>();
        Whole::build(Arc::clone(self), values)
    }
}
