// Path: crates/storage/src/redb_store.rs
use lodesync_api::storage::{Backend, PrefixIter, StorageError};
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

/// Single shared table; key families are partitioned by their one-byte
/// key-type tag prefix, not by separate tables.
const OBSERVED: TableDefinition<&[u8], &[u8]> = TableDefinition::new("OBSERVED");

/// Durable `Backend` on top of a `redb` database.
///
/// Every operation runs in its own transaction, giving atomic single-key
/// semantics. Prefix scans collect the matching range from a read snapshot
/// before returning, so a scan never observes writes issued after its
/// construction and deletes issued mid-scan cannot skip or repeat entries.
#[derive(Clone)]
pub struct RedbBackend {
    db: Arc<Database>,
}

impl RedbBackend {
    /// Opens (or creates) the database at `path` and ensures the table exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = Database::create(path).map_err(|e| StorageError::Backend(e.to_string()))?;
        {
            let w = db
                .begin_write()
                .map_err(|e| StorageError::Backend(e.to_string()))?;
            w.open_table(OBSERVED)
                .map_err(|e| StorageError::Backend(e.to_string()))?;
            w.commit()
                .map_err(|e| StorageError::Backend(e.to_string()))?;
        }
        Ok(Self { db: Arc::new(db) })
    }
}

impl Backend for RedbBackend {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        let w = self
            .db
            .begin_write()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        {
            let mut t = w
                .open_table(OBSERVED)
                .map_err(|e| StorageError::Backend(e.to_string()))?;
            t.insert(key, value)
                .map_err(|e| StorageError::Backend(e.to_string()))?;
        }
        w.commit().map_err(|e| StorageError::Backend(e.to_string()))
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let r = self
            .db
            .begin_read()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        let t = r
            .open_table(OBSERVED)
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        let out = t
            .get(key)
            .map_err(|e| StorageError::Backend(e.to_string()))?
            .map(|v| v.value().to_vec());
        Ok(out)
    }

    fn delete(&self, key: &[u8]) -> Result<(), StorageError> {
        let w = self
            .db
            .begin_write()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        {
            let mut t = w
                .open_table(OBSERVED)
                .map_err(|e| StorageError::Backend(e.to_string()))?;
            t.remove(key)
                .map_err(|e| StorageError::Backend(e.to_string()))?;
        }
        w.commit().map_err(|e| StorageError::Backend(e.to_string()))
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Result<PrefixIter, StorageError> {
        let r = self
            .db
            .begin_read()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        let t = r
            .open_table(OBSERVED)
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        let mut entries = Vec::new();
        let range = t
            .range(prefix..)
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        for item in range {
            let (k, v) = item.map_err(|e| StorageError::Backend(e.to_string()))?;
            if !k.value().starts_with(prefix) {
                break;
            }
            entries.push((k.value().to_vec(), v.value().to_vec()));
        }
        Ok(Box::new(entries.into_iter().map(Ok)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, RedbBackend) {
        let dir = tempfile::tempdir().unwrap();
        let backend = RedbBackend::open(dir.path().join("observed.redb")).unwrap();
        (dir, backend)
    }

    #[test]
    fn put_get_delete() {
        let (_dir, backend) = open_temp();
        assert_eq!(backend.get(b"k").unwrap(), None);

        backend.put(b"k", b"v1").unwrap();
        assert_eq!(backend.get(b"k").unwrap(), Some(b"v1".to_vec()));

        backend.put(b"k", b"v2").unwrap();
        assert_eq!(backend.get(b"k").unwrap(), Some(b"v2".to_vec()));

        backend.delete(b"k").unwrap();
        assert_eq!(backend.get(b"k").unwrap(), None);
        // Deleting an absent key is not an error.
        backend.delete(b"k").unwrap();
    }

    #[test]
    fn prefix_scan_is_scoped_and_ordered() {
        let (_dir, backend) = open_temp();
        backend.put(&[1, 9], b"a").unwrap();
        backend.put(&[2, 1], b"b").unwrap();
        backend.put(&[2, 3], b"c").unwrap();
        backend.put(&[3, 0], b"d").unwrap();

        let entries: Vec<_> = backend
            .iter_prefix(&[2])
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            entries,
            vec![
                (vec![2, 1], b"b".to_vec()),
                (vec![2, 3], b"c".to_vec()),
            ]
        );
    }

    #[test]
    fn scan_is_a_snapshot_under_mid_scan_deletes() {
        let (_dir, backend) = open_temp();
        for i in 0u8..5 {
            backend.put(&[7, i], &[i]).unwrap();
        }

        let mut seen = Vec::new();
        for entry in backend.iter_prefix(&[7]).unwrap() {
            let (key, _) = entry.unwrap();
            // Deleting the current key must not skip or repeat the others.
            backend.delete(&key).unwrap();
            seen.push(key);
        }
        assert_eq!(seen.len(), 5);
        let remaining: Vec<_> = backend
            .iter_prefix(&[7])
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert!(remaining.is_empty());
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observed.redb");
        {
            let backend = RedbBackend::open(&path).unwrap();
            backend.put(b"durable", b"yes").unwrap();
        }
        let backend = RedbBackend::open(&path).unwrap();
        assert_eq!(backend.get(b"durable").unwrap(), Some(b"yes".to_vec()));
    }
}
