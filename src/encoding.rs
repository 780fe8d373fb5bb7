//! Binary encoding of domain values for the target store.
//!
//! | Kind | Layout | Absent |
//! |------|--------|--------|
//! | `String` | UTF-8 bytes | zero-length |
//! | `u64` | 8-byte big-endian | zero-length |
//!
//! Big-endian integers sort bytewise in numeric order, which range scans on
//! the target store rely on.
//!
//! An [`Encoded`] value keeps its source value next to the bytes. Equality,
//! ordering and hashing look at the source value only, so encoders can be
//! used directly as map keys.

use crate::error::{ReplicatorError, Result};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A value kind with a fixed byte layout.
pub trait Encode {
    /// Append this value's encoding to `buf`.
    fn encode_into(&self, buf: &mut Vec<u8>);
}

impl Encode for String {
    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.as_bytes());
    }
}

impl Encode for u64 {
    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_be_bytes());
    }
}

/// A source value together with its encoding.
#[derive(Debug, Clone)]
pub struct Encoded<T> {
    value: Option<T>,
    bytes: Vec<u8>,
}

pub type StringEncoder = Encoded<String>;
pub type U64Encoder = Encoded<u64>;

impl<T: Encode> Encoded<T> {
    pub fn new(value: Option<T>) -> Self {
        let mut bytes = Vec::new();
        if let Some(v) = &value {
            v.encode_into(&mut bytes);
        }
        Self { value, bytes }
    }

    pub fn present(value: T) -> Self {
        Self::new(Some(value))
    }

    pub fn absent() -> Self {
        Self::new(None)
    }
}

impl<T> Encoded<T> {
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_absent(&self) -> bool {
        self.value.is_none()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl<T: Encode> From<Option<T>> for Encoded<T> {
    fn from(value: Option<T>) -> Self {
        Self::new(value)
    }
}

impl From<String> for Encoded<String> {
    fn from(value: String) -> Self {
        Self::present(value)
    }
}

impl From<&str> for Encoded<String> {
    fn from(value: &str) -> Self {
        Self::present(value.to_string())
    }
}

impl From<u64> for Encoded<u64> {
    fn from(value: u64) -> Self {
        Self::present(value)
    }
}

impl<T> AsRef<[u8]> for Encoded<T> {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl<T: PartialEq> PartialEq for Encoded<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq> Eq for Encoded<T> {}

impl<T: Hash> Hash for Encoded<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: PartialOrd> PartialOrd for Encoded<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<T: Ord> Ord for Encoded<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

/// Decode an integer column. Empty input is an absent value.
pub fn decode_u64(bytes: &[u8]) -> Result<Option<u64>> {
    match bytes.len() {
        0 => Ok(None),
        8 => {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(bytes);
            Ok(Some(u64::from_be_bytes(buf)))
        }
        n => Err(ReplicatorError::parse_msg(
            "InvalidLength",
            format!("expected 0 or 8 bytes for u64, got {}", n),
        )),
    }
}

/// Decode a string column. Empty input is read back as an empty string,
/// since absence and `""` share the zero-length encoding.
pub fn decode_string(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| ReplicatorError::from_parse(&e))
}
