use num_bigint::{BigInt, Sign};
use num_traits::Zero;

use crate::{bridge::InteropItem, error::InteropError};

/// Value living on the interpreter evaluation stack
///
/// Handlers never look at a value without matching on its variant, a value
/// of the wrong kind is reported as `WrongHandleType`.
#[derive(Clone, Debug, PartialEq)]
pub enum StackItem {
    ByteArray(Vec<u8>),
    Integer(BigInt),
    Boolean(bool),
    Array(Vec<StackItem>),
    Struct(Vec<StackItem>),
    Map(Vec<(StackItem, StackItem)>),
    Interop(InteropItem),
}

impl StackItem {
    // Empty byte array, pushed when a lookup misses
    pub fn empty() -> Self {
        StackItem::ByteArray(Vec::new())
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            StackItem::ByteArray(_) => "byte array",
            StackItem::Integer(_) => "integer",
            StackItem::Boolean(_) => "boolean",
            StackItem::Array(_) => "array",
            StackItem::Struct(_) => "struct",
            StackItem::Map(_) => "map",
            StackItem::Interop(item) => item.kind_name(),
        }
    }

    pub fn is_empty_bytes(&self) -> bool {
        matches!(self, StackItem::ByteArray(bytes) if bytes.is_empty())
    }

    // Byte view of a primitive value: integers are little endian two's
    // complement with zero encoded as no byte at all
    pub fn try_bytes(&self) -> Result<Vec<u8>, InteropError> {
        match self {
            StackItem::ByteArray(bytes) => Ok(bytes.clone()),
            StackItem::Integer(value) => Ok(integer_to_bytes(value)),
            StackItem::Boolean(true) => Ok(vec![1]),
            StackItem::Boolean(false) => Ok(Vec::new()),
            other => Err(InteropError::WrongHandleType {
                expected: "byte array",
                found: other.kind_name(),
            }),
        }
    }

    pub fn try_integer(&self) -> Result<BigInt, InteropError> {
        match self {
            StackItem::Integer(value) => Ok(value.clone()),
            StackItem::ByteArray(bytes) => Ok(BigInt::from_signed_bytes_le(bytes)),
            StackItem::Boolean(value) => Ok(BigInt::from(*value as u8)),
            other => Err(InteropError::WrongHandleType {
                expected: "integer",
                found: other.kind_name(),
            }),
        }
    }

    pub fn to_bool(&self) -> bool {
        match self {
            StackItem::ByteArray(bytes) => bytes.iter().any(|b| *b != 0),
            StackItem::Integer(value) => !value.is_zero(),
            StackItem::Boolean(value) => *value,
            StackItem::Array(_) | StackItem::Struct(_) | StackItem::Map(_) | StackItem::Interop(_) => true,
        }
    }

    pub fn try_interop(&self, expected: &'static str) -> Result<&InteropItem, InteropError> {
        match self {
            StackItem::Interop(item) => Ok(item),
            other => Err(InteropError::WrongHandleType {
                expected,
                found: other.kind_name(),
            }),
        }
    }
}

pub fn integer_to_bytes(value: &BigInt) -> Vec<u8> {
    if value.is_zero() {
        Vec::new()
    } else {
        value.to_signed_bytes_le()
    }
}

// Low 64 bits of the magnitude with the sign applied, integers wider than
// 64 bits are silently truncated
pub fn integer_to_i64_wrapping(value: &BigInt) -> i64 {
    let low = value.magnitude().iter_u64_digits().next().unwrap_or(0) as i64;
    if value.sign() == Sign::Minus {
        low.wrapping_neg()
    } else {
        low
    }
}

impl From<Vec<u8>> for StackItem {
    fn from(value: Vec<u8>) -> Self {
        StackItem::ByteArray(value)
    }
}

impl From<&[u8]> for StackItem {
    fn from(value: &[u8]) -> Self {
        StackItem::ByteArray(value.to_vec())
    }
}

impl From<bool> for StackItem {
    fn from(value: bool) -> Self {
        StackItem::Boolean(value)
    }
}

impl From<BigInt> for StackItem {
    fn from(value: BigInt) -> Self {
        StackItem::Integer(value)
    }
}

macro_rules! integer_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for StackItem {
                fn from(value: $t) -> Self {
                    StackItem::Integer(BigInt::from(value))
                }
            }
        )*
    };
}

integer_from!(u8, u16, u32, u64, i64, usize);

impl From<InteropItem> for StackItem {
    fn from(value: InteropItem) -> Self {
        StackItem::Interop(value)
    }
}

impl From<Vec<StackItem>> for StackItem {
    fn from(value: Vec<StackItem>) -> Self {
        StackItem::Array(value)
    }
}
