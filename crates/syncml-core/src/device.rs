//! Device identity and enrollment records.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Registry key for a device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceIdentifier {
    pub id: String,
    #[serde(rename = "type")]
    pub device_type: String,
}

impl DeviceIdentifier {
    pub fn new(id: impl Into<String>, device_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            device_type: device_type.into(),
        }
    }
}

impl fmt::Display for DeviceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device_type, self.id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ownership {
    /// Bring your own device.
    #[default]
    Byod,
    /// Corporate owned.
    Cope,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrolmentStatus {
    #[default]
    Active,
    Inactive,
    Unreachable,
    Blocked,
    Removed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolmentInfo {
    pub owner: String,
    #[serde(default)]
    pub ownership: Ownership,
    #[serde(default)]
    pub status: EnrolmentStatus,
}

/// Device attributes written by this service, by wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceProperty {
    OsVersion,
    Imsi,
    Imei,
    Vendor,
    DeviceModel,
    MacAddress,
    /// Screen resolution as reported by the device.
    DeviceInfo,
}

impl DeviceProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceProperty::OsVersion => "OS_VERSION",
            DeviceProperty::Imsi => "IMSI",
            DeviceProperty::Imei => "IMEI",
            DeviceProperty::Vendor => "VENDOR",
            DeviceProperty::DeviceModel => "DEVICE_MODEL",
            DeviceProperty::MacAddress => "MAC_ADDRESS",
            DeviceProperty::DeviceInfo => "DEVICE_INFO",
        }
    }
}

impl fmt::Display for DeviceProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a device as handed to or returned by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub identifier: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub enrolment_info: EnrolmentInfo,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl DeviceRecord {
    pub fn new(identifier: impl Into<String>, device_type: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            device_type: device_type.into(),
            enrolment_info: EnrolmentInfo::default(),
            properties: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> DeviceIdentifier {
        DeviceIdentifier::new(self.identifier.clone(), self.device_type.clone())
    }

    pub fn property(&self, name: DeviceProperty) -> Option<&str> {
        self.properties.get(name.as_str()).map(String::as_str)
    }

    pub fn set_property(&mut self, name: DeviceProperty, value: impl Into<String>) {
        self.properties.insert(name.as_str().to_string(), value.into());
    }

    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_property_overwrites_by_name() {
        let mut record = DeviceRecord::new("DEV-1", "WINDOWS");
        assert!(!record.has_properties());

        record.set_property(DeviceProperty::Imei, "A");
        record.set_property(DeviceProperty::Imei, "B");

        assert_eq!(record.properties.len(), 1);
        assert_eq!(record.property(DeviceProperty::Imei), Some("B"));
        assert_eq!(record.key(), DeviceIdentifier::new("DEV-1", "WINDOWS"));
    }

    #[test]
    fn test_enrolment_defaults() {
        let info = EnrolmentInfo::default();
        assert_eq!(info.ownership, Ownership::Byod);
        assert_eq!(info.status, EnrolmentStatus::Active);
    }
}
