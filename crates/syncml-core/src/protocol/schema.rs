//! Positional item schemas.
//!
//! Replace and Results sections carry no field names, only order. Each schema
//! is the index -> field table for one section; real devices depend on these
//! positions, so they are a wire contract.

use std::fmt;

use thiserror::Error;

use super::constants::*;
use super::message::Item;
use crate::device::DeviceProperty;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("{section} section has {actual} items, {field} expected at index {index}")]
    MissingItem {
        section: &'static str,
        field: String,
        index: usize,
        actual: usize,
    },
}

/// Fields a device reports in its first-contact Replace section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceField {
    DeviceId,
    Manufacturer,
    Model,
    /// OS / model version.
    ModVersion,
    Language,
}

impl fmt::Display for ReplaceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplaceField::DeviceId => write!(f, "DevId"),
            ReplaceField::Manufacturer => write!(f, "DevMan"),
            ReplaceField::Model => write!(f, "DevMod"),
            ReplaceField::ModVersion => write!(f, "ModVer"),
            ReplaceField::Language => write!(f, "Lang"),
        }
    }
}

/// Ordered index -> field table for one body section.
#[derive(Debug)]
pub struct ItemSchema<F: 'static> {
    section: &'static str,
    fields: &'static [(usize, F)],
}

impl<F: Copy + PartialEq + fmt::Display> ItemSchema<F> {
    pub const fn new(section: &'static str, fields: &'static [(usize, F)]) -> Self {
        Self { section, fields }
    }

    pub fn section(&self) -> &'static str {
        self.section
    }

    pub fn fields(&self) -> &'static [(usize, F)] {
        self.fields
    }

    /// Item index carrying `field`.
    pub fn position(&self, field: F) -> Option<usize> {
        self.fields
            .iter()
            .find(|(_, f)| *f == field)
            .map(|(index, _)| *index)
    }

    /// Minimum number of items a section needs to satisfy this schema.
    pub fn required_len(&self) -> usize {
        self.fields
            .iter()
            .map(|(index, _)| index + 1)
            .max()
            .unwrap_or(0)
    }

    /// Pick the schema's fields out of `items`, in schema order.
    pub fn decode(&self, items: &[Item]) -> Result<Decoded<F>, SchemaError> {
        let mut values = Vec::with_capacity(self.fields.len());
        for &(index, field) in self.fields {
            let item = items.get(index).ok_or_else(|| SchemaError::MissingItem {
                section: self.section,
                field: field.to_string(),
                index,
                actual: items.len(),
            })?;
            values.push((field, item.data.clone()));
        }
        Ok(Decoded { values })
    }
}

/// Values extracted by [`ItemSchema::decode`].
#[derive(Debug, Clone)]
pub struct Decoded<F> {
    values: Vec<(F, String)>,
}

impl<F: Copy + PartialEq> Decoded<F> {
    pub fn get(&self, field: F) -> &str {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.values.iter().map(|(f, v)| (*f, v.as_str()))
    }
}

/// Phase 1: Replace section pushed on first contact.
pub const REPLACE_SCHEMA: ItemSchema<ReplaceField> = ItemSchema::new(
    "Replace",
    &[
        (DEVICE_ID_POSITION, ReplaceField::DeviceId),
        (DEVICE_MAN_POSITION, ReplaceField::Manufacturer),
        (DEVICE_MODEL_POSITION, ReplaceField::Model),
        (DEVICE_MOD_VER_POSITION, ReplaceField::ModVersion),
        (DEVICE_LANG_POSITION, ReplaceField::Language),
    ],
);

/// Phase 2: Results answering the information-request catalog.
///
/// Indices follow the catalog order; positions 3..=6 answer requests this
/// service does not store.
pub const RESULTS_SCHEMA: ItemSchema<DeviceProperty> = ItemSchema::new(
    "Results",
    &[
        (IMEI_POSITION, DeviceProperty::Imei),
        (OS_VERSION_POSITION, DeviceProperty::OsVersion),
        (IMSI_POSITION, DeviceProperty::Imsi),
        (VENDOR_POSITION, DeviceProperty::Vendor),
        (MAC_ADDRESS_POSITION, DeviceProperty::MacAddress),
        (RESOLUTION_POSITION, DeviceProperty::DeviceInfo),
    ],
);

#[cfg(test)]
mod tests {
    use super::*;

    fn items(values: &[&str]) -> Vec<Item> {
        values.iter().map(|v| Item::new(*v)).collect()
    }

    #[test]
    fn test_replace_positions() {
        assert_eq!(REPLACE_SCHEMA.required_len(), 5);
        let decoded = REPLACE_SCHEMA
            .decode(&items(&["DEV-1", "Acme", "X100", "1.0", "en"]))
            .unwrap();
        assert_eq!(decoded.get(ReplaceField::DeviceId), "DEV-1");
        assert_eq!(decoded.get(ReplaceField::Manufacturer), "Acme");
        assert_eq!(decoded.get(ReplaceField::Model), "X100");
        assert_eq!(decoded.get(ReplaceField::ModVersion), "1.0");
        assert_eq!(decoded.get(ReplaceField::Language), "en");
    }

    #[test]
    fn test_results_skip_reserved_positions() {
        assert_eq!(RESULTS_SCHEMA.required_len(), 10);
        let decoded = RESULTS_SCHEMA
            .decode(&items(&[
                "10.0", "IMSI1", "IMEI1", "r3", "r4", "r5", "r6", "Acme", "AA:BB", "1920x1080",
            ]))
            .unwrap();
        assert_eq!(decoded.get(DeviceProperty::OsVersion), "10.0");
        assert_eq!(decoded.get(DeviceProperty::Vendor), "Acme");
        assert_eq!(decoded.get(DeviceProperty::DeviceInfo), "1920x1080");
        assert!(decoded.iter().all(|(_, v)| !v.starts_with('r')));
    }

    #[test]
    fn test_short_section_reports_missing_index() {
        let err = RESULTS_SCHEMA
            .decode(&items(&["10.0", "IMSI1", "IMEI1"]))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingItem {
                section: "Results",
                field: "VENDOR".to_string(),
                index: 7,
                actual: 3,
            }
        );
    }
}
