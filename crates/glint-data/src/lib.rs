//! Glint Data Layer
//!
//! Runtime values, type hints, the host-object capability, and the chained
//! variable contexts the evaluator resolves identifiers against.
//!
//! The data layer knows nothing about parsing: it is consumed by the
//! expression evaluator on one side and by whatever host binds named values
//! on the other.

pub mod context;
pub mod keys;
pub mod value;

pub use context::DataContext;
pub use keys::DataKey;
pub use value::{HostHandle, HostObject, NumericRank, TypeHint, Value};
