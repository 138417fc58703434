use std::fmt;

use crate::error::{Error, Result};
use crate::utils::{ID_LEN, ObjectId, ObjectKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    File,
    Directory,
}

impl EntryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::File => "100644",
            EntryMode::Directory => "40000",
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            EntryMode::File => ObjectKind::Blob,
            EntryMode::Directory => ObjectKind::Tree,
        }
    }

    fn parse(bytes: &[u8]) -> Result<Self> {
        match bytes {
            b"100644" => Ok(EntryMode::File),
            b"40000" | b"040000" => Ok(EntryMode::Directory),
            other => Err(Error::Encoding(format!(
                "unsupported entry mode {:?}",
                String::from_utf8_lossy(other)
            ))),
        }
    }
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: EntryMode,
    pub name: Vec<u8>, // final path component, raw bytes
    pub id: ObjectId,
}

impl TreeEntry {
    pub fn new(mode: EntryMode, name: impl Into<Vec<u8>>, id: ObjectId) -> Self {
        TreeEntry {
            mode,
            name: name.into(),
            id,
        }
    }

    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut entry = Vec::new();
        entry.extend_from_slice(self.mode.as_str().as_bytes());
        entry.push(b' ');

        entry.extend_from_slice(&self.name);
        entry.push(0); // NULL separator

        entry.extend_from_slice(self.id.as_bytes());
        entry
    }
}

/// Payload of a tree object: entries ordered by name bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Tree { entries }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.entries.iter().flat_map(TreeEntry::to_bytes).collect()
    }

    /// Decode a stored tree payload, keeping the stored order.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let mut entries = Vec::new();
        let mut rest = payload;

        while !rest.is_empty() {
            let space = rest
                .iter()
                .position(|&b| b == b' ')
                .ok_or_else(|| Error::Encoding("tree entry without mode".to_string()))?;
            let mode = EntryMode::parse(&rest[..space])?;
            rest = &rest[space + 1..];

            let nul = rest
                .iter()
                .position(|&b| b == 0)
                .ok_or_else(|| Error::Encoding("unterminated tree entry name".to_string()))?;
            let name = rest[..nul].to_vec();
            rest = &rest[nul + 1..];

            if rest.len() < ID_LEN {
                return Err(Error::Encoding("truncated tree entry id".to_string()));
            }
            let mut sha1 = [0u8; ID_LEN];
            sha1.copy_from_slice(&rest[..ID_LEN]);
            rest = &rest[ID_LEN..];

            entries.push(TreeEntry::new(mode, name, ObjectId::from_bytes(sha1)));
        }

        Ok(Tree { entries })
    }
}
