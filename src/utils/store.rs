use flate2::Compression;
use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::utils::{HEX_LEN, ObjectId, ObjectKind, compress, decode, decompress, encode};

const MIN_PREFIX_LEN: usize = 4;

/// Loose objects under `<objects>/<2 hex>/<38 hex>`, zlib-compressed.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    objects_dir: PathBuf,
    compression: Compression,
}

impl ObjectStore {
    pub fn new(objects_dir: impl Into<PathBuf>) -> Self {
        ObjectStore {
            objects_dir: objects_dir.into(),
            compression: Compression::default(),
        }
    }

    /// Compression level for newly written objects. Does not affect ids.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    pub fn path_for(&self, id: &ObjectId) -> PathBuf {
        let (dir_name, file_name) = id.shard();
        self.objects_dir.join(dir_name).join(file_name)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.path_for(id).is_file()
    }

    /// Encode, hash, compress and persist an object. Storing an object that
    /// already exists leaves the existing file untouched.
    #[instrument(skip(self, kind, payload), fields(kind = %kind, size = payload.len()), level = "debug")]
    pub fn put(&self, kind: ObjectKind, payload: &[u8]) -> Result<ObjectId> {
        let full_data = encode(kind, payload);
        let id = ObjectId::digest(&full_data);
        let object_path = self.path_for(&id);

        if object_path.exists() {
            debug!(%id, "object already stored");
            return Ok(id);
        }

        let compressed =
            compress(&full_data, self.compression).map_err(|e| Error::storage(&object_path, e))?;

        let (dir_name, _) = id.shard();
        let object_dir = self.objects_dir.join(dir_name);
        fs::create_dir_all(&object_dir).map_err(|e| Error::storage(&object_dir, e))?;

        // Write beside the final path, then link it into place so readers never
        // observe a partial object.
        let mut temp =
            NamedTempFile::new_in(&object_dir).map_err(|e| Error::storage(&object_dir, e))?;
        temp.write_all(&compressed)
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| Error::storage(temp.path(), e))?;

        match temp.persist_noclobber(&object_path) {
            Ok(_) => debug!(%id, bytes = compressed.len(), "object written"),
            Err(_) if object_path.exists() => debug!(%id, "object stored concurrently"),
            Err(err) => return Err(Error::storage(&object_path, err.error)),
        }

        Ok(id)
    }

    /// Read an object back as `(kind, payload)`.
    pub fn get(&self, id: &ObjectId) -> Result<(ObjectKind, Vec<u8>)> {
        let object_path = self.path_for(id);
        let compressed = match fs::read(&object_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::NotFound(id.to_hex())),
            Err(e) => return Err(Error::storage(object_path, e)),
        };

        let full_data = decompress(&compressed).map_err(|e| Error::Corrupt {
            id: *id,
            reason: format!("decompression failed: {e}"),
        })?;

        let (kind, payload) = decode(&full_data).map_err(|e| Error::Corrupt {
            id: *id,
            reason: e.to_string(),
        })?;

        let actual = ObjectId::digest(&full_data);
        if actual != *id {
            return Err(Error::Corrupt {
                id: *id,
                reason: format!("content hashes to {actual}"),
            });
        }

        Ok((kind, payload))
    }

    /// Expand a full or abbreviated hex id to the single stored object it names.
    pub fn resolve_prefix(&self, prefix: &str) -> Result<ObjectId> {
        if prefix.len() == HEX_LEN {
            return prefix.parse();
        }
        if prefix.len() < MIN_PREFIX_LEN
            || prefix.len() > HEX_LEN
            || !prefix.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(Error::InvalidObjectId(prefix.to_string()));
        }

        let prefix = prefix.to_ascii_lowercase();
        let (dir_name, rest) = prefix.split_at(2);
        let object_dir = self.objects_dir.join(dir_name);

        let entries = match fs::read_dir(&object_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::NotFound(prefix)),
            Err(e) => return Err(Error::storage(object_dir, e)),
        };

        let mut found: Option<ObjectId> = None;
        for entry in entries {
            let entry = entry.map_err(|e| Error::storage(&object_dir, e))?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if file_name.len() != HEX_LEN - 2 || !file_name.starts_with(rest) {
                continue;
            }
            let Ok(id) = format!("{dir_name}{file_name}").parse::<ObjectId>() else {
                continue;
            };
            if found.is_some() {
                return Err(Error::AmbiguousPrefix(prefix));
            }
            found = Some(id);
        }

        found.ok_or(Error::NotFound(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ObjectStore) {
        let dir = TempDir::new().unwrap();
        let store = ObjectStore::new(dir.path().join("objects"));
        (dir, store)
    }

    #[test]
    fn put_writes_to_sharded_path() {
        let (_dir, store) = store();
        let id = store.put(ObjectKind::Blob, b"hi\n").unwrap();
        assert_eq!(id.to_hex(), "45b983be36b73c0788dc9cbcb76cbb80fc7bb057");

        let path = store
            .objects_dir()
            .join("45")
            .join("b983be36b73c0788dc9cbcb76cbb80fc7bb057");
        assert_eq!(store.path_for(&id), path);
        assert!(path.is_file());
    }

    #[test]
    fn stored_file_is_compressed_canonical_encoding() {
        let (_dir, store) = store();
        let id = store.put(ObjectKind::Blob, b"hi\n").unwrap();
        let raw = fs::read(store.path_for(&id)).unwrap();
        assert_eq!(decompress(&raw).unwrap(), b"blob 3\0hi\n");
    }

    #[test]
    fn put_then_get() {
        let (_dir, store) = store();
        let payload = b"\0binary\0payload\xff".to_vec();
        let id = store.put(ObjectKind::Blob, &payload).unwrap();
        assert_eq!(store.get(&id).unwrap(), (ObjectKind::Blob, payload));
    }

    #[test]
    fn compression_level_does_not_change_id() {
        let (_dir, store) = store();
        let other = TempDir::new().unwrap();
        let fast = ObjectStore::new(other.path()).with_compression(Compression::fast());
        let data = b"same bytes, different level".repeat(50);
        assert_eq!(
            store.put(ObjectKind::Blob, &data).unwrap(),
            fast.put(ObjectKind::Blob, &data).unwrap()
        );
    }

    #[test]
    fn get_missing_is_not_found() {
        let (_dir, store) = store();
        let id = ObjectId::digest(b"nothing here");
        assert!(matches!(store.get(&id), Err(Error::NotFound(_))));
        assert!(!store.contains(&id));
    }

    #[test]
    fn get_rejects_garbage_file() {
        let (_dir, store) = store();
        let id = ObjectId::digest(b"whatever");
        let path = store.path_for(&id);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"not zlib at all").unwrap();
        assert!(matches!(store.get(&id), Err(Error::Corrupt { .. })));
    }

    #[test]
    fn get_rejects_bad_header_and_wrong_content() {
        let (_dir, store) = store();
        let id = ObjectId::digest(b"whatever");
        let path = store.path_for(&id);
        fs::create_dir_all(path.parent().unwrap()).unwrap();

        fs::write(&path, compress(b"blob 10\0short", Compression::default()).unwrap()).unwrap();
        assert!(matches!(store.get(&id), Err(Error::Corrupt { .. })));

        fs::write(&path, compress(b"blob 2\0ok", Compression::default()).unwrap()).unwrap();
        assert!(matches!(store.get(&id), Err(Error::Corrupt { .. })));
    }

    #[test]
    fn put_fails_when_objects_dir_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("objects");
        fs::write(&blocker, b"").unwrap();
        let store = ObjectStore::new(&blocker);
        assert!(matches!(
            store.put(ObjectKind::Blob, b"x"),
            Err(Error::Storage { .. })
        ));
    }

    #[test]
    fn resolve_prefix_expands_unique_ids() {
        let (_dir, store) = store();
        let id = store.put(ObjectKind::Blob, b"hi\n").unwrap();

        assert_eq!(store.resolve_prefix("45b9").unwrap(), id);
        assert_eq!(store.resolve_prefix("45B983BE").unwrap(), id);
        assert_eq!(store.resolve_prefix(&id.to_hex()).unwrap(), id);
        assert!(matches!(store.resolve_prefix("45b8"), Err(Error::NotFound(_))));
        assert!(matches!(store.resolve_prefix("ffff"), Err(Error::NotFound(_))));
        assert!(matches!(store.resolve_prefix("45b"), Err(Error::InvalidObjectId(_))));
        assert!(matches!(store.resolve_prefix("45xz"), Err(Error::InvalidObjectId(_))));
    }

    #[test]
    fn resolve_prefix_reports_ambiguity() {
        let (_dir, store) = store();
        // two fake entries sharing a long prefix
        let shard = store.objects_dir().join("ab");
        fs::create_dir_all(&shard).unwrap();
        fs::write(shard.join(format!("cd{}", "0".repeat(36))), b"").unwrap();
        fs::write(shard.join(format!("cd{}", "1".repeat(36))), b"").unwrap();

        assert!(matches!(store.resolve_prefix("abcd"), Err(Error::AmbiguousPrefix(_))));
        assert!(store.resolve_prefix("abcd0").is_ok());
    }
}
