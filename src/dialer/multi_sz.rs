//! The ordered multi-string list stored in the `CustomDLL` value.
//!
//! The wire form is `REG_MULTI_SZ`: concatenated NUL-terminated UTF-16
//! strings with one extra NUL closing the list. In memory the list is just
//! an ordered sequence of entries; the framing exists only in
//! [`MultiSz::from_wide`] and [`MultiSz::to_wide`].

use crate::{Error, Result};

/// Maximum serialized size of the value, in UTF-16 code units, counting
/// every terminator.
pub const MAX_VALUE_UNITS: usize = 1024;

/// Ordered sequence of dialer DLL paths, bounded by the serialized size of
/// the registry value it lives in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSz {
    entries: Vec<String>,
}

impl MultiSz {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from entries, validating each entry and the size bound.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for entry in entries {
            list.append(entry.as_ref())?;
        }
        Ok(list)
    }

    /// Decode the double-terminated wire form.
    ///
    /// An empty segment signals end-of-list; anything after it is ignored.
    /// Tolerates a missing final terminator and treats an empty buffer as
    /// zero entries.
    pub fn from_wide(units: &[u16]) -> Self {
        let mut entries = Vec::new();
        for segment in units.split(|&unit| unit == 0) {
            if segment.is_empty() {
                break;
            }
            entries.push(String::from_utf16_lossy(segment));
        }
        Self { entries }
    }

    /// Encode to the double-terminated wire form.
    pub fn to_wide(&self) -> Vec<u16> {
        let mut units = Vec::with_capacity(self.serialized_units());
        for entry in &self.entries {
            units.extend(entry.encode_utf16());
            units.push(0);
        }
        units.push(0);
        units
    }

    /// Entries in list order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the first entry matching `path` case-insensitively, or
    /// `None` when the insert point is the end of the list.
    pub fn position_of(&self, path: &str) -> Option<usize> {
        let needle = path.to_lowercase();
        self.entries
            .iter()
            .position(|entry| entry.to_lowercase() == needle)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.position_of(path).is_some()
    }

    /// Serialized size in UTF-16 units, counting every terminator.
    pub fn serialized_units(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| entry.encode_utf16().count() + 1)
            .sum::<usize>()
            + 1
    }

    /// Append `path` at the end of the list.
    ///
    /// Fails without modifying the list when `path` is empty, contains an
    /// embedded NUL, or would push the serialized size past
    /// [`MAX_VALUE_UNITS`].
    pub fn append(&mut self, path: &str) -> Result<()> {
        if path.is_empty() {
            return Err(Error::InvalidInput("entry must not be empty".into()));
        }
        if path.contains('\0') {
            return Err(Error::InvalidInput(format!(
                "entry contains an embedded NUL: {path:?}"
            )));
        }
        let required = self.serialized_units() + path.encode_utf16().count() + 1;
        if required > MAX_VALUE_UNITS {
            return Err(Error::ValueFull {
                required,
                max: MAX_VALUE_UNITS,
            });
        }
        self.entries.push(path.to_string());
        Ok(())
    }

    /// Remove every entry matching `path` case-insensitively, preserving
    /// the relative order of the rest. Returns how many were removed.
    pub fn remove_all(&mut self, path: &str) -> usize {
        let needle = path.to_lowercase();
        let before = self.entries.len();
        self.entries.retain(|entry| entry.to_lowercase() != needle);
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wide_empty_buffer() {
        assert!(MultiSz::from_wide(&[]).is_empty());
    }

    #[test]
    fn test_from_wide_sole_nul() {
        assert!(MultiSz::from_wide(&[0]).is_empty());
    }

    #[test]
    fn test_from_wide_decodes_entries() {
        // "ab\0c\0\0"
        let units = [97, 98, 0, 99, 0, 0];
        let list = MultiSz::from_wide(&units);
        assert_eq!(list.entries(), ["ab", "c"]);
    }

    #[test]
    fn test_from_wide_tolerates_missing_final_terminator() {
        let units = [97, 98, 0, 99];
        let list = MultiSz::from_wide(&units);
        assert_eq!(list.entries(), ["ab", "c"]);
    }

    #[test]
    fn test_from_wide_stops_at_empty_segment() {
        // The empty segment is the end-of-list marker; "c" after it is junk.
        let units = [97, 0, 0, 99, 0, 0];
        let list = MultiSz::from_wide(&units);
        assert_eq!(list.entries(), ["a"]);
    }

    #[test]
    fn test_to_wide_double_terminates() {
        let list = MultiSz::from_entries(["ab", "c"]).unwrap();
        assert_eq!(list.to_wide(), vec![97, 98, 0, 99, 0, 0]);
    }

    #[test]
    fn test_to_wide_round_trips() {
        let list = MultiSz::from_entries([r"C:\a\x.dll", r"C:\b\y.dll"]).unwrap();
        assert_eq!(MultiSz::from_wide(&list.to_wide()), list);
    }

    #[test]
    fn test_serialized_units_counts_all_terminators() {
        let list = MultiSz::from_entries(["ab", "c"]).unwrap();
        assert_eq!(list.serialized_units(), 6);
        assert_eq!(MultiSz::new().serialized_units(), 1);
    }

    #[test]
    fn test_position_of_is_case_insensitive() {
        let list = MultiSz::from_entries([r"C:\a\x.dll", r"C:\b\y.dll"]).unwrap();
        assert_eq!(list.position_of(r"c:\B\Y.DLL"), Some(1));
        assert_eq!(list.position_of(r"C:\c\z.dll"), None);
    }

    #[test]
    fn test_append_rejects_empty_entry() {
        let mut list = MultiSz::new();
        assert!(matches!(list.append(""), Err(Error::InvalidInput(_))));
        assert!(list.is_empty());
    }

    #[test]
    fn test_append_rejects_embedded_nul() {
        let mut list = MultiSz::new();
        assert!(matches!(
            list.append("C:\\a\0b.dll"),
            Err(Error::InvalidInput(_))
        ));
        assert!(list.is_empty());
    }

    #[test]
    fn test_append_at_exact_capacity() {
        // One entry of 1022 units serializes to exactly 1024 units.
        let mut list = MultiSz::new();
        let entry = "a".repeat(MAX_VALUE_UNITS - 2);
        list.append(&entry).unwrap();
        assert_eq!(list.serialized_units(), MAX_VALUE_UNITS);

        let err = list.append("x").unwrap_err();
        match err {
            Error::ValueFull { required, max } => {
                assert_eq!(required, MAX_VALUE_UNITS + 2);
                assert_eq!(max, MAX_VALUE_UNITS);
            }
            other => panic!("expected ValueFull, got {other:?}"),
        }
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove_all_returns_count_and_preserves_order() {
        let mut list =
            MultiSz::from_entries([r"C:\a.dll", r"C:\b.dll", r"C:\A.DLL", r"C:\c.dll"]).unwrap();
        assert_eq!(list.remove_all(r"c:\a.dll"), 2);
        assert_eq!(list.entries(), [r"C:\b.dll", r"C:\c.dll"]);
        assert_eq!(list.remove_all(r"c:\a.dll"), 0);
    }
}
