use sha1::{Digest, Sha1};
use std::{fmt, str::FromStr};

use crate::error::Error;

pub const ID_LEN: usize = 20;
pub const HEX_LEN: usize = ID_LEN * 2;

/// SHA-1 fingerprint of an object's canonical encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; ID_LEN]);

impl ObjectId {
    pub fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        ObjectId(bytes)
    }

    /// Hash already-encoded object bytes (header included).
    pub fn digest(encoded: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(encoded);

        let result = hasher.finalize();
        let mut sha1 = [0u8; ID_LEN];
        sha1.copy_from_slice(&result[..]);
        ObjectId(sha1)
    }

    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Shard directory name and file name within it.
    pub fn shard(&self) -> (String, String) {
        let sha1_hex = self.to_hex();
        let (dir_name, file_name) = sha1_hex.split_at(2);
        (dir_name.to_string(), file_name.to_string())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != HEX_LEN {
            return Err(Error::InvalidObjectId(s.to_string()));
        }
        let mut bytes = [0u8; ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| Error::InvalidObjectId(s.to_string()))?;
        Ok(ObjectId(bytes))
    }
}
