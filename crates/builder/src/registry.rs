//! Type registry: canonical field lists keyed by type identity.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use wholeable_core::{TypeId, Value, WholeError, WholeResult};

use crate::value_type::{TypeDecl, ValueType};
use crate::whole::Whole;

/// Arena of registered value types.
///
/// Composition runs once per type, inside [`define`](Self::define), before
/// any instance of it exists. The registry answers the ancestor query
/// (a parent's canonical field list) from its stored metadata rather than by
/// walking live types.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<TypeId, Arc<ValueType>>,
    names: HashMap<String, TypeId>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composes and registers `decl`.
    pub fn define(&mut self, decl: TypeDecl) -> WholeResult<Arc<ValueType>> {
        if let Some(name) = decl.name() {
            if self.names.contains_key(name) {
                return Err(WholeError::duplicate_type(name));
            }
        }

        let parent = match decl.parent() {
            Some(parent_id) => Some(self.resolve(parent_id)?),
            None => None,
        };
        let ty = Arc::new(ValueType::compose(decl, parent.as_deref())?);

        if let Some(name) = ty.name() {
            self.names.insert(name.to_owned(), ty.id());
        }
        self.types.insert(ty.id(), Arc::clone(&ty));
        debug!(type_name = %ty.display_name(), registered = self.types.len(), "registered value type");
        Ok(ty)
    }

    pub fn get(&self, id: TypeId) -> Option<&Arc<ValueType>> {
        self.types.get(&id)
    }

    pub fn lookup(&self, name: &str) -> Option<&Arc<ValueType>> {
        self.names.get(name).and_then(|id| self.types.get(id))
    }

    /// Canonical field list of `id`, the list a derived type composes onto.
    pub fn ancestor_members(&self, id: TypeId) -> WholeResult<&[String]> {
        self.types
            .get(&id)
            .map(|ty| ty.members())
            .ok_or_else(|| WholeError::unknown_type(id.to_string()))
    }

    /// Builds an instance of the registered type `id`.
    pub fn construct<I, K, V>(&self, id: TypeId, values: I) -> WholeResult<Whole>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.resolve(id)?.construct(values)
    }

    /// Builds an instance from a JSON object of named values.
    ///
    /// Anything but an object fails with `InvalidInput`.
    pub fn construct_from_json(&self, id: TypeId, json: serde_json::Value) -> WholeResult<Whole> {
        let ty = self.resolve(id)?;
        match json {
            serde_json::Value::Object(map) => {
                ty.construct(map.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
            other => Err(WholeError::invalid_input(
                ty.display_name(),
                format!("expected a JSON object, got {}", json_kind(&other)),
            )),
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn resolve(&self, id: TypeId) -> WholeResult<Arc<ValueType>> {
        self.types
            .get(&id)
            .cloned()
            .ok_or_else(|| WholeError::unknown_type(id.to_string()))
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
