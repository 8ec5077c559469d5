//! Persistence gateway for the dialer registration list.
//!
//! This module provides the value-store seam the registration workflows
//! run against:
//! - `RegistryValueStore` - the RasMan `CustomDLL` registry value (Windows)
//! - `MemoryStore` - in-memory store for tests

#[cfg(windows)]
mod registry;

#[cfg(windows)]
pub use registry::RegistryValueStore;

use crate::Result;
use crate::dialer::MultiSz;

/// A single named multi-string value in a durable store.
///
/// `read` distinguishes "value absent" (`Ok(None)`) from a read failure so
/// callers can treat absence as the empty list. An empty multi-string is
/// never written; callers delete the value instead.
pub trait ValueStore {
    /// Read the current list, or `None` when the value is absent.
    fn read(&self) -> Result<Option<MultiSz>>;

    /// Replace the value with `list`, serialized in multi-string form.
    fn write(&mut self, list: &MultiSz) -> Result<()>;

    /// Remove the value entirely.
    fn delete(&mut self) -> Result<()>;

    /// Get the store location description (for display purposes).
    fn location(&self) -> String;
}

/// In-memory value store.
///
/// Holds the raw wire buffer rather than the decoded list so tests can
/// assert byte-level invariants, e.g. that a failed mutation left the
/// stored value untouched.
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: Option<Vec<u16>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the serialized form of `list`.
    pub fn with_list(list: &MultiSz) -> Self {
        Self {
            value: Some(list.to_wide()),
        }
    }

    /// Raw stored buffer, or `None` when the value is absent.
    pub fn raw(&self) -> Option<&[u16]> {
        self.value.as_deref()
    }
}

impl ValueStore for MemoryStore {
    fn read(&self) -> Result<Option<MultiSz>> {
        Ok(self.value.as_deref().map(MultiSz::from_wide))
    }

    fn write(&mut self, list: &MultiSz) -> Result<()> {
        self.value = Some(list.to_wide());
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        self.value = None;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_reads_absent_as_none() {
        let store = MemoryStore::new();
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn test_memory_store_write_read_round_trip() {
        let list = MultiSz::from_entries([r"C:\a\x.dll", r"C:\b\y.dll"]).unwrap();
        let mut store = MemoryStore::new();
        store.write(&list).unwrap();
        assert_eq!(store.read().unwrap().unwrap(), list);
        assert_eq!(store.raw(), Some(list.to_wide().as_slice()));
    }

    #[test]
    fn test_memory_store_delete_leaves_value_absent() {
        let list = MultiSz::from_entries([r"C:\a\x.dll"]).unwrap();
        let mut store = MemoryStore::with_list(&list);
        store.delete().unwrap();
        assert!(store.raw().is_none());
        assert!(store.read().unwrap().is_none());
    }
}
