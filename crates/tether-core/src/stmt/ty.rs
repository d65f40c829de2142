use super::Value;
use std::fmt;

/// Declared type of a model attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Boolean value
    Bool,

    /// 4-byte signed integer
    Integer,

    /// 8-byte signed integer
    BigInt,

    /// Unconstrained text
    String,

    /// 128-bit universally unique identifier
    Uuid,
}

impl Type {
    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Integer | Type::BigInt)
    }

    /// Returns `true` if `value` can be stored in a column of this type.
    /// `NULL` is accepted by every type; nullability is checked separately.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (Type::Bool, Value::Bool(_)) => true,
            (Type::Integer, Value::I64(v)) => i32::try_from(*v).is_ok(),
            (Type::BigInt, Value::I64(_)) => true,
            (Type::String, Value::String(_)) => true,
            (Type::Uuid, Value::Uuid(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Type::Bool => "BOOLEAN",
            Type::Integer => "INTEGER",
            Type::BigInt => "BIGINT",
            Type::String => "VARCHAR(255)",
            Type::Uuid => "UUID",
        })
    }
}
