//! Runtime values.
//!
//! `Value` is what every expression evaluates to. Numeric variants keep
//! their exact kind so mixed-type arithmetic can promote along the rank
//! ladder instead of flattening everything to `f64`.

use std::fmt;
use std::sync::Arc;

/// The rank ladder for mixed-type arithmetic.
///
/// Operations run at the higher of the two operand ranks, so
/// `i64 * f32 = f32`, not `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NumericRank {
    I16,
    I32,
    I64,
    F32,
    F64,
}

/// Best-known result type of an expression, used only for tooling
/// (autocomplete, coloring). Never consulted during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeHint {
    Unknown,
    Bool,
    Str,
    I16,
    I32,
    I64,
    F32,
    F64,
    Object,
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeHint::Unknown => "unknown",
            TypeHint::Bool => "bool",
            TypeHint::Str => "string",
            TypeHint::I16 => "i16",
            TypeHint::I32 => "i32",
            TypeHint::I64 => "i64",
            TypeHint::F32 => "f32",
            TypeHint::F64 => "f64",
            TypeHint::Object => "object",
        };
        f.write_str(name)
    }
}

/// A host-side object the expression language can read members from.
///
/// The engine never reflects over host types itself; field access is
/// delegated entirely to this capability. `None` from `member` means the
/// object has no field or property of that name.
pub trait HostObject: Send + Sync {
    /// Look up a member value by name.
    fn member(&self, name: &str) -> Option<Value>;

    /// Type name used in diagnostics ("Field or property 'x' not found
    /// for type '...'").
    fn type_name(&self) -> &str {
        "object"
    }
}

/// Shared handle to a host object. Equality is identity: two handles are
/// equal only when they point at the same object.
#[derive(Clone)]
pub struct HostHandle(Arc<dyn HostObject>);

impl HostHandle {
    pub fn new(object: impl HostObject + 'static) -> Self {
        Self(Arc::new(object))
    }

    pub fn member(&self, name: &str) -> Option<Value> {
        self.0.member(name)
    }

    pub fn type_name(&self) -> &str {
        self.0.type_name()
    }
}

impl PartialEq for HostHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for HostHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostHandle<{}>", self.0.type_name())
    }
}

/// A runtime value.
///
/// `Absent` is the "not found" sentinel returned by context lookups for
/// unset variables; it is a normal value, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Absent,
    Bool(bool),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Object(HostHandle),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Numeric rank of this value, or `None` for non-numeric values.
    pub fn numeric_rank(&self) -> Option<NumericRank> {
        match self {
            Value::I16(_) => Some(NumericRank::I16),
            Value::I32(_) => Some(NumericRank::I32),
            Value::I64(_) => Some(NumericRank::I64),
            Value::F32(_) => Some(NumericRank::F32),
            Value::F64(_) => Some(NumericRank::F64),
            _ => None,
        }
    }

    /// Widen a numeric value to `f64`. `None` for non-numeric values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::I16(v) => Some(f64::from(*v)),
            Value::I32(v) => Some(f64::from(*v)),
            Value::I64(v) => Some(*v as f64),
            Value::F32(v) => Some(f64::from(*v)),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Widen a numeric value to `i64`, truncating fractional parts.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I16(v) => Some(i64::from(*v)),
            Value::I32(v) => Some(i64::from(*v)),
            Value::I64(v) => Some(*v),
            Value::F32(v) => Some(*v as i64),
            Value::F64(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Type name used in diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Absent => "absent",
            Value::Bool(_) => "bool",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Str(_) => "string",
            Value::Object(handle) => handle.type_name(),
        }
    }

    /// Best-known type hint for this value.
    pub fn hint(&self) -> TypeHint {
        match self {
            Value::Absent => TypeHint::Unknown,
            Value::Bool(_) => TypeHint::Bool,
            Value::I16(_) => TypeHint::I16,
            Value::I32(_) => TypeHint::I32,
            Value::I64(_) => TypeHint::I64,
            Value::F32(_) => TypeHint::F32,
            Value::F64(_) => TypeHint::F64,
            Value::Str(_) => TypeHint::Str,
            Value::Object(_) => TypeHint::Object,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str("<absent>"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Str(v) => f.write_str(v),
            Value::Object(handle) => write!(f, "<{}>", handle.type_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::I16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Point {
        x: i32,
        y: i32,
    }

    impl HostObject for Point {
        fn member(&self, name: &str) -> Option<Value> {
            match name {
                "x" => Some(Value::I32(self.x)),
                "y" => Some(Value::I32(self.y)),
                _ => None,
            }
        }

        fn type_name(&self) -> &str {
            "Point"
        }
    }

    #[test]
    fn test_rank_ordering() {
        assert!(NumericRank::I16 < NumericRank::I32);
        assert!(NumericRank::I64 < NumericRank::F32);
        assert!(NumericRank::F32 < NumericRank::F64);
    }

    #[test]
    fn test_numeric_rank() {
        assert_eq!(Value::I64(1).numeric_rank(), Some(NumericRank::I64));
        assert_eq!(Value::F32(1.0).numeric_rank(), Some(NumericRank::F32));
        assert_eq!(Value::Str("1".into()).numeric_rank(), None);
        assert_eq!(Value::Absent.numeric_rank(), None);
    }

    #[test]
    fn test_equality_no_coercion() {
        // Same kind, same value.
        assert_eq!(Value::I32(1), Value::I32(1));
        // Different numeric kinds never compare equal.
        assert_ne!(Value::I32(1), Value::I64(1));
        // A string and a number are simply unequal, never an error.
        assert_ne!(Value::Str("1".into()), Value::I32(1));
    }

    #[test]
    fn test_object_identity_equality() {
        let a = HostHandle::new(Point { x: 1, y: 2 });
        let b = a.clone();
        let c = HostHandle::new(Point { x: 1, y: 2 });
        assert_eq!(Value::Object(a.clone()), Value::Object(b));
        assert_ne!(Value::Object(a), Value::Object(c));
    }

    #[test]
    fn test_member_lookup() {
        let point = HostHandle::new(Point { x: 3, y: 4 });
        assert_eq!(point.member("x"), Some(Value::I32(3)));
        assert_eq!(point.member("z"), None);
        assert_eq!(point.type_name(), "Point");
    }
}
