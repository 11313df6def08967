// Path: crates/storage/src/memory.rs
use lodesync_api::storage::{Backend, KvEntry, PrefixIter, StorageError};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

/// Ephemeral `Backend` over a `BTreeMap`.
///
/// Used for diskless operation and throughout the test suites. Prefix scans
/// clone the matching range under the read lock, so the iterator is a
/// point-in-time snapshot and holds no lock while being consumed.
#[derive(Default)]
pub struct MemoryBackend {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(|_| StorageError::Backend("lock poisoned".to_string()))?
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self
            .entries
            .read()
            .map_err(|_| StorageError::Backend("lock poisoned".to_string()))?
            .get(key)
            .cloned())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(|_| StorageError::Backend("lock poisoned".to_string()))?
            .remove(key);
        Ok(())
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Result<PrefixIter, StorageError> {
        let guard = self
            .entries
            .read()
            .map_err(|_| StorageError::Backend("lock poisoned".to_string()))?;
        let entries: Vec<KvEntry> = guard
            .range::<[u8], _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(Box::new(entries.into_iter().map(Ok)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_delete() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get(b"k").unwrap(), None);

        backend.put(b"k", b"v1").unwrap();
        backend.put(b"k", b"v2").unwrap();
        assert_eq!(backend.get(b"k").unwrap(), Some(b"v2".to_vec()));

        backend.delete(b"k").unwrap();
        backend.delete(b"k").unwrap();
        assert_eq!(backend.get(b"k").unwrap(), None);
    }

    #[test]
    fn prefix_scan_does_not_leak_neighbouring_tags() {
        let backend = MemoryBackend::new();
        backend.put(&[1, 255], b"before").unwrap();
        backend.put(&[2], b"bare").unwrap();
        backend.put(&[2, 0], b"inside").unwrap();
        backend.put(&[3], b"after").unwrap();

        let keys: Vec<_> = backend
            .iter_prefix(&[2])
            .unwrap()
            .map(|e| e.unwrap().0)
            .collect();
        assert_eq!(keys, vec![vec![2], vec![2, 0]]);
    }

    #[test]
    fn snapshot_is_stable_under_concurrent_mutation() {
        let backend = MemoryBackend::new();
        backend.put(&[9, 0], b"a").unwrap();
        backend.put(&[9, 1], b"b").unwrap();

        let mut iter = backend.iter_prefix(&[9]).unwrap();
        backend.delete(&[9, 1]).unwrap();
        backend.put(&[9, 2], b"c").unwrap();

        // The snapshot reflects the state at construction time.
        let keys: Vec<_> = iter.by_ref().map(|e| e.unwrap().0).collect();
        assert_eq!(keys, vec![vec![9, 0], vec![9, 1]]);
    }
}
