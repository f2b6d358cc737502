//! Data model: runtime values, coercions and path resolution

pub mod coercion;
pub mod path;
pub mod value;

pub use value::{Getter, ObjectMap, Value};

use rustc_hash::FxHashMap;

/// Variable bindings: name to value, where a value may be a getter
pub type VariableMap = FxHashMap<String, Value>;
