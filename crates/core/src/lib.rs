//! `wholeable-core` — value object building blocks.
//!
//! This crate contains the **pure** primitives (no type registry, no logging):
//! dynamic field values, identifiers, the error model and the value object
//! behavior bundle.

pub mod error;
pub mod id;
pub mod value;
pub mod value_object;

pub use error::{WholeError, WholeResult};
pub use id::{InstanceId, TypeId};
pub use value::{Record, Value};
pub use value_object::ValueObject;
