//! Install and uninstall mutations for the dialer list.
//!
//! Each invocation reads the list fresh from the store, mutates it in
//! memory, and writes the result back. A mutation that leaves the list
//! empty deletes the value instead of writing an empty multi-string, so an
//! absent value and an empty list stay interchangeable.

use serde::Serialize;

use crate::Result;
use crate::dialer::MultiSz;
use crate::store::ValueStore;

/// What a registration mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationOutcome {
    /// The path was appended to the list.
    Registered,
    /// The path was already listed; nothing was written.
    AlreadyRegistered,
    /// Every matching entry was removed from the list.
    Unregistered,
    /// The path was not listed; nothing was written.
    NotRegistered,
}

impl RegistrationOutcome {
    /// One-line description for diagnostics.
    pub fn describe(self, path: &str) -> String {
        match self {
            Self::Registered => format!("Registered {path}"),
            Self::AlreadyRegistered => format!("{path} is already registered; nothing to do"),
            Self::Unregistered => format!("Removed {path}"),
            Self::NotRegistered => format!("{path} is not registered; nothing to do"),
        }
    }
}

/// Ensure `path` is present in the list.
///
/// An absent value reads as the empty list. On a case-insensitive match the
/// store is left untouched; otherwise the path is appended after all
/// existing entries and the list is written back. A capacity failure leaves
/// the store unmodified.
pub fn register(store: &mut dyn ValueStore, path: &str) -> Result<RegistrationOutcome> {
    let mut list = store.read()?.unwrap_or_default();
    if list.contains(path) {
        return Ok(RegistrationOutcome::AlreadyRegistered);
    }
    list.append(path)?;
    store.write(&list)?;
    Ok(RegistrationOutcome::Registered)
}

/// Ensure `path` is absent from the list.
///
/// An absent value means there is nothing to remove. Every case-insensitive
/// match is dropped, the rest keep their relative order, and the result is
/// written back, or the value is deleted when nothing remains.
pub fn unregister(store: &mut dyn ValueStore, path: &str) -> Result<RegistrationOutcome> {
    let Some(mut list) = store.read()? else {
        return Ok(RegistrationOutcome::NotRegistered);
    };
    if list.remove_all(path) == 0 {
        return Ok(RegistrationOutcome::NotRegistered);
    }
    if list.is_empty() {
        store.delete()?;
    } else {
        store.write(&list)?;
    }
    Ok(RegistrationOutcome::Unregistered)
}
