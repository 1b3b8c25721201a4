//! Value instances.

use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, trace};

use wholeable_core::{InstanceId, TypeId, Value, ValueObject, WholeError, WholeResult};

use crate::diff::{self, Diff};
use crate::freeze::FreezeState;
use crate::value_type::ValueType;

/// An instance of a [`ValueType`].
///
/// Carries exactly the canonical fields of its type. Instances of immutable
/// types are frozen before the constructor returns.
///
/// `PartialEq`, `Eq` and `Hash` follow [`strict_equals`](Self::strict_equals),
/// so instances are sound map and set keys. A clone is a distinct instance:
/// it gets a fresh instance id, as does every copy made by
/// [`with`](Self::with).
pub struct Whole {
    ty: Arc<ValueType>,
    instance_id: InstanceId,
    values: Vec<Value>,
    state: FreezeState,
}

impl Whole {
    /// The constructor every instance goes through, `with` included.
    pub(crate) fn build(ty: Arc<ValueType>, mut values: IndexMap<String, Value>) -> WholeResult<Self> {
        if let Some(unknown) = values.keys().find(|k| ty.position(k).is_none()) {
            return Err(WholeError::unknown_field(ty.display_name(), unknown.clone()));
        }

        let mut state = FreezeState::initial(ty.mutability());
        let mut assigned = Vec::with_capacity(ty.members().len());
        for field in ty.members() {
            let value = match values.shift_remove(field) {
                Some(value) => value,
                None => ty
                    .defaults()
                    .get(field)
                    .cloned()
                    .ok_or_else(|| WholeError::missing_field(ty.display_name(), field.clone()))?,
            };
            assigned.push(value);
        }

        state = state.finalize();
        if state.is_frozen() {
            trace!(type_name = %ty.display_name(), "instance frozen");
        }

        Ok(Self {
            ty,
            instance_id: InstanceId::new(),
            values: assigned,
            state,
        })
    }

    pub fn value_type(&self) -> &Arc<ValueType> {
        &self.ty
    }

    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    pub fn state(&self) -> FreezeState {
        self.state
    }

    pub fn is_frozen(&self) -> bool {
        self.state.is_frozen()
    }

    /// Assigns `field`.
    ///
    /// Fails with `UndefinedWrite` unless a mutable layer exposed `field`, then
    /// with `FrozenState` if the instance is frozen. On failure nothing changes.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> WholeResult<()> {
        let index = match self.ty.position(field) {
            Some(index) if self.ty.is_writable(field) => index,
            _ => {
                debug!(type_name = %self.ty.display_name(), field, "rejected write to undefined writer");
                return Err(WholeError::undefined_write(self.ty.display_name(), field));
            }
        };
        if self.state.is_frozen() {
            debug!(type_name = %self.ty.display_name(), field, "rejected write to frozen instance");
            return Err(WholeError::frozen_state(self.ty.display_name(), field));
        }
        self.values[index] = value.into();
        Ok(())
    }

    /// `eql?`: exact same concrete type and equal field values.
    pub fn strict_equals(&self, other: &Whole) -> bool {
        self.ty.id() == other.ty.id() && self.values == other.values
    }

    /// `==`: `other` is of this type or a descendant, with an equal
    /// structural hash.
    pub fn loose_equals(&self, other: &Whole) -> bool {
        other.ty.descends_from(self.ty.id()) && self.structural_hash() == other.structural_hash()
    }

    /// Strict equality against any value; non-instances answer `false`.
    pub fn strict_equals_value(&self, other: &Value) -> bool {
        match other {
            Value::Whole(record) => {
                record.value_type_id() == self.ty.id() && record.values() == self.values.as_slice()
            }
            _ => false,
        }
    }

    /// Loose equality against any value. A record keeps only its type id, so
    /// the type test here is exact.
    pub fn loose_equals_value(&self, other: &Value) -> bool {
        match other {
            Value::Whole(record) => {
                record.value_type_id() == self.ty.id()
                    && record.structural_hash() == self.structural_hash()
            }
            _ => false,
        }
    }

    /// `equal?`: the very same instance.
    pub fn same_instance(&self, other: &Whole) -> bool {
        self.instance_id == other.instance_id
    }

    /// Fields that differ from `other`, see [`Diff`].
    pub fn diff(&self, other: &Whole) -> Diff {
        if other.ty.descends_from(self.ty.id()) {
            diff::changed_fields(self, other)
        } else {
            diff::foreign(self)
        }
    }

    /// Diff against any value; non-instances are foreign.
    pub fn diff_value(&self, other: &Value) -> Diff {
        match other {
            Value::Whole(record) if record.value_type_id() == self.ty.id() => {
                diff::changed_fields(self, record)
            }
            _ => diff::foreign(self),
        }
    }

    /// A new instance of the same type with `overrides` applied over the
    /// current values.
    pub fn with<I, K, V>(&self, overrides: I) -> WholeResult<Whole>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut values = self.to_h();
        for (field, value) in overrides {
            let field = field.into();
            if self.ty.position(&field).is_none() {
                return Err(WholeError::unknown_field(self.ty.display_name(), field));
            }
            values.insert(field, value.into());
        }
        Whole::build(Arc::clone(&self.ty), values)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.ty
                .members()
                .iter()
                .zip(&self.values)
                .map(|(k, v)| (k.clone(), v.into()))
                .collect(),
        )
    }
}

impl Clone for Whole {
    fn clone(&self) -> Self {
        Self {
            ty: Arc::clone(&self.ty),
            instance_id: InstanceId::new(),
            values: self.values.clone(),
            state: self.state,
        }
    }
}

impl ValueObject for Whole {
    fn value_type_id(&self) -> TypeId {
        self.ty.id()
    }

    fn type_name(&self) -> &str {
        self.ty.display_name()
    }

    fn members(&self) -> &[String] {
        self.ty.members()
    }

    fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(self.ty.position(field)?)
    }
}

impl PartialEq for Whole {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

impl Eq for Whole {}

impl Hash for Whole {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl fmt::Display for Whole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl fmt::Debug for Whole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl Serialize for Whole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in self.ty.members().iter().zip(&self.values) {
            out.serialize_entry(key, value)?;
        }
        out.end()
    }
}

impl From<&Whole> for Value {
    fn from(value: &Whole) -> Self {
        Value::Whole(value.to_record())
    }
}

impl From<Whole> for Value {
    fn from(value: Whole) -> Self {
        Value::Whole(value.to_record())
    }
}
