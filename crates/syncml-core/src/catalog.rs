//! Information-request catalog sent to an enrolling device.
//!
//! The device answers in a Results section whose items follow this order, and
//! [`RESULTS_SCHEMA`](crate::protocol::RESULTS_SCHEMA) decodes them by
//! position. Reordering one without the other breaks enrollment.

use crate::device::DeviceProperty;
use crate::protocol::Operation;

/// Attribute requested with an INFO operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoRequest {
    SoftwareVersion,
    Imsi,
    Imei,
    DevId,
    Manufacturer,
    Model,
    Language,
    Vender,
    MacAddress,
    Resolution,
}

impl InfoRequest {
    pub fn code(&self) -> &'static str {
        match self {
            InfoRequest::SoftwareVersion => "SOFTWARE_VERSION",
            InfoRequest::Imsi => "IMSI",
            InfoRequest::Imei => "IMEI",
            InfoRequest::DevId => "DEV_ID",
            InfoRequest::Manufacturer => "MANUFACTURER",
            InfoRequest::Model => "MODEL",
            InfoRequest::Language => "LANGUAGE",
            InfoRequest::Vender => "VENDER",
            InfoRequest::MacAddress => "MAC_ADDRESS",
            InfoRequest::Resolution => "RESOLUTION",
        }
    }

    /// Property the answer is stored under, if any.
    pub fn stored_as(&self) -> Option<DeviceProperty> {
        match self {
            InfoRequest::SoftwareVersion => Some(DeviceProperty::OsVersion),
            InfoRequest::Imsi => Some(DeviceProperty::Imsi),
            InfoRequest::Imei => Some(DeviceProperty::Imei),
            InfoRequest::Vender => Some(DeviceProperty::Vendor),
            InfoRequest::MacAddress => Some(DeviceProperty::MacAddress),
            InfoRequest::Resolution => Some(DeviceProperty::DeviceInfo),
            InfoRequest::DevId
            | InfoRequest::Manufacturer
            | InfoRequest::Model
            | InfoRequest::Language => None,
        }
    }

    pub fn to_operation(self) -> Operation {
        Operation::info(self.code())
    }
}

/// Requests in wire order.
pub const INFO_CATALOG: [InfoRequest; 10] = [
    InfoRequest::SoftwareVersion,
    InfoRequest::Imsi,
    InfoRequest::Imei,
    InfoRequest::DevId,
    InfoRequest::Manufacturer,
    InfoRequest::Model,
    InfoRequest::Language,
    InfoRequest::Vender,
    InfoRequest::MacAddress,
    InfoRequest::Resolution,
];

/// Build the INFO operations for the enrollment reply.
pub fn build_info_request() -> Vec<Operation> {
    INFO_CATALOG.iter().map(|r| r.to_operation()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{OperationKind, RESULTS_SCHEMA};

    #[test]
    fn test_catalog_order() {
        let codes: Vec<String> = build_info_request().into_iter().map(|op| op.code).collect();
        assert_eq!(
            codes,
            [
                "SOFTWARE_VERSION",
                "IMSI",
                "IMEI",
                "DEV_ID",
                "MANUFACTURER",
                "MODEL",
                "LANGUAGE",
                "VENDER",
                "MAC_ADDRESS",
                "RESOLUTION",
            ]
        );
        assert!(
            build_info_request()
                .iter()
                .all(|op| op.kind == OperationKind::Info)
        );
    }

    #[test]
    fn test_catalog_matches_results_schema() {
        assert_eq!(RESULTS_SCHEMA.required_len(), INFO_CATALOG.len());
        for (index, request) in INFO_CATALOG.iter().enumerate() {
            if let Some(property) = request.stored_as() {
                assert_eq!(
                    RESULTS_SCHEMA.position(property),
                    Some(index),
                    "{}",
                    request.code()
                );
            }
        }
        let stored = INFO_CATALOG.iter().filter(|r| r.stored_as().is_some()).count();
        assert_eq!(stored, RESULTS_SCHEMA.fields().len());
    }
}
