use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Identifier of a stored object, up to [`ObjectId::MAX_LEN`] bytes wide.
///
/// Git ids are 20 bytes and in-memory ids 32, so the width travels with
/// the bytes. Ids are compared and printed, never decoded.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    len: u8,
    bytes: [u8; 32],
}

impl ObjectId {
    pub const MAX_LEN: usize = 32;

    /// BLAKE3 of `data`, with no domain prefix.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::from_hash(blake3::hash(data).into())
    }

    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self {
            len: Self::MAX_LEN as u8,
            bytes: hash,
        }
    }

    /// Wraps a backend-native id of 1 to [`MAX_LEN`](Self::MAX_LEN) bytes.
    pub fn from_slice(raw: &[u8]) -> Result<Self, TypeError> {
        let len = raw.len();
        if !(1..=Self::MAX_LEN).contains(&len) {
            return Err(TypeError::InvalidLength {
                max: Self::MAX_LEN,
                actual: len,
            });
        }
        let mut id = Self {
            len: len as u8,
            bytes: [0; Self::MAX_LEN],
        };
        id.bytes[..len].copy_from_slice(raw);
        Ok(id)
    }

    /// Placeholder id; all 32 bytes zero.
    pub const fn null() -> Self {
        Self {
            len: Self::MAX_LEN as u8,
            bytes: [0; Self::MAX_LEN],
        }
    }

    pub fn is_null(&self) -> bool {
        self.as_slice().iter().all(|b| *b == 0)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_slice())
    }

    /// At most the first 4 bytes, as hex.
    pub fn short_hex(&self) -> String {
        let raw = self.as_slice();
        hex::encode(&raw[..raw.len().min(4)])
    }

    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        match hex::decode(s) {
            Ok(raw) => Self::from_slice(&raw),
            Err(e) => Err(TypeError::InvalidHex(e.to_string())),
        }
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectId").field(&self.short_hex()).finish()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; 32]> for ObjectId {
    fn from(hash: [u8; 32]) -> Self {
        Self::from_hash(hash)
    }
}

/// Ids serialize as their hex spelling.
impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(de::Error::custom)
    }
}
