//! Windows registry implementation of the value store.

use std::io;

use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_READ, KEY_SET_VALUE, REG_MULTI_SZ};
use winreg::{RegKey, RegValue};

use super::ValueStore;
use crate::dialer::MultiSz;
use crate::{Error, Result};

/// Registry key owned by the remote-access service. Only the value below
/// is edited, never the key itself.
pub const RASMAN_PARAMETERS_KEY: &str = r"SYSTEM\CurrentControlSet\Services\RasMan\Parameters";

/// Multi-string value listing custom dialer DLLs.
pub const CUSTOM_DLL_VALUE: &str = "CustomDLL";

/// `ValueStore` backed by the `CustomDLL` value under the RasMan
/// parameters key. The key handle is released when the store is dropped,
/// on every exit path.
pub struct RegistryValueStore {
    key: RegKey,
}

impl RegistryValueStore {
    /// Open the RasMan parameters key with read and set access.
    pub fn open() -> Result<Self> {
        let key = RegKey::predef(HKEY_LOCAL_MACHINE)
            .open_subkey_with_flags(RASMAN_PARAMETERS_KEY, KEY_READ | KEY_SET_VALUE)
            .map_err(Error::StoreOpen)?;
        Ok(Self { key })
    }
}

impl ValueStore for RegistryValueStore {
    fn read(&self) -> Result<Option<MultiSz>> {
        match self.key.get_raw_value(CUSTOM_DLL_VALUE) {
            Ok(raw) => Ok(Some(MultiSz::from_wide(&units_from_bytes(&raw.bytes)))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::StoreRead(e)),
        }
    }

    fn write(&mut self, list: &MultiSz) -> Result<()> {
        let raw = RegValue {
            bytes: bytes_from_units(&list.to_wide()),
            vtype: REG_MULTI_SZ,
        };
        self.key
            .set_raw_value(CUSTOM_DLL_VALUE, &raw)
            .map_err(Error::StoreWrite)
    }

    fn delete(&mut self) -> Result<()> {
        self.key
            .delete_value(CUSTOM_DLL_VALUE)
            .map_err(Error::StoreDelete)
    }

    fn location(&self) -> String {
        format!(r"HKLM\{RASMAN_PARAMETERS_KEY}\{CUSTOM_DLL_VALUE}")
    }
}

fn units_from_bytes(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect()
}

fn bytes_from_units(units: &[u16]) -> Vec<u8> {
    units.iter().flat_map(|unit| unit.to_le_bytes()).collect()
}
