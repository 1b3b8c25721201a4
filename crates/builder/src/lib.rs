//! `wholeable-builder` — whole value objects from ordered field lists.
//!
//! A type acquires value-object behavior by including one or more
//! [`FieldSpec`]s in its [`TypeDecl`]. The [`TypeRegistry`] composes those
//! specs onto the parent's canonical field list and stores the resulting
//! [`ValueType`]; its instances ([`Whole`]) compare, hash, describe, diff and
//! copy structurally by that list.
//!
//! ```ignore
//! let mut registry = TypeRegistry::new();
//! let point = registry.define(TypeDecl::named("Point").include(fields(["x", "y"])))?;
//!
//! let p = point.construct([("x", 1), ("y", 2)])?;
//! assert!(p.is_frozen());
//! assert_eq!(p.diff(&p.with([("y", 9)])?).len(), 1);
//! ```

pub mod compose;
pub mod diff;
pub mod field_spec;
pub mod freeze;
pub mod registry;
pub mod value_type;
pub mod whole;

mod integration_tests;

pub use compose::compose;
pub use diff::{Change, Diff};
pub use field_spec::{FieldSpec, Mutability};
pub use freeze::FreezeState;
pub use registry::TypeRegistry;
pub use value_type::{TypeDecl, ValueType};
pub use whole::Whole;

pub use wholeable_core::{InstanceId, Record, TypeId, Value, ValueObject, WholeError, WholeResult};

/// Shorthand for [`FieldSpec::new`]: an immutable spec over `names`.
pub fn fields<I, S>(names: I) -> FieldSpec
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    FieldSpec::new(names)
}
