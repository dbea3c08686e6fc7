//! Device profile extraction and registry updates for the enrollment handshake.

use tracing::{debug, instrument};

use crate::device::{
    DeviceIdentifier, DeviceProperty, DeviceRecord, EnrolmentInfo, EnrolmentStatus, Ownership,
};
use crate::error::SyncError;
use crate::protocol::{
    Item, ProtocolMessage, REPLACE_SCHEMA, RESULTS_SCHEMA, ReplaceField, SchemaError,
};
use crate::services::{DeviceManagementError, DeviceRegistry};

/// Outcome of a registry write that must not abort the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Registry accepted the write.
    Applied,
    /// Phase 2 only: the stored record already has properties.
    Skipped,
    /// Registry refused; logged and the device is answered anyway.
    Failed(DeviceManagementError),
}

impl PersistOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, PersistOutcome::Applied)
    }
}

/// Build the new-enrollment record from a phase-1 Replace section.
///
/// IMSI and IMEI are unknown until the device answers the info requests and
/// are recorded empty. The language item is read but not stored.
pub fn extract_from_replace(
    items: &[Item],
    owner: &str,
    device_type: &str,
) -> Result<DeviceRecord, SchemaError> {
    let fields = REPLACE_SCHEMA.decode(items)?;

    debug!(
        "OS Version: {}, DevID: {}, DevMan: {}, DevMod: {}, DevLang: {}",
        fields.get(ReplaceField::ModVersion),
        fields.get(ReplaceField::DeviceId),
        fields.get(ReplaceField::Manufacturer),
        fields.get(ReplaceField::Model),
        fields.get(ReplaceField::Language),
    );

    let mut record = DeviceRecord::new(fields.get(ReplaceField::DeviceId), device_type);
    record.enrolment_info = EnrolmentInfo {
        owner: owner.to_string(),
        ownership: Ownership::Byod,
        status: EnrolmentStatus::Active,
    };
    record.set_property(DeviceProperty::OsVersion, fields.get(ReplaceField::ModVersion));
    record.set_property(DeviceProperty::Imsi, "");
    record.set_property(DeviceProperty::Imei, "");
    record.set_property(DeviceProperty::Vendor, fields.get(ReplaceField::Manufacturer));
    record.set_property(DeviceProperty::DeviceModel, fields.get(ReplaceField::Model));
    Ok(record)
}

/// Pick the six stored attributes out of a phase-2 Results section.
pub fn extract_from_results(
    items: &[Item],
) -> Result<Vec<(DeviceProperty, String)>, SchemaError> {
    let fields = RESULTS_SCHEMA.decode(items)?;
    Ok(fields.iter().map(|(p, v)| (p, v.to_string())).collect())
}

/// Drives enrollment and enrollment completion against the registry.
pub struct ProfileExtractor<'a, R: DeviceRegistry + ?Sized> {
    registry: &'a R,
    device_type: &'a str,
}

impl<'a, R: DeviceRegistry + ?Sized> ProfileExtractor<'a, R> {
    pub fn new(registry: &'a R, device_type: &'a str) -> Self {
        Self {
            registry,
            device_type,
        }
    }

    /// Phase 1: submit a new enrollment built from the Replace section.
    ///
    /// The outer error aborts the request; the inner one is the registry's
    /// refusal, which the caller logs and moves past.
    #[instrument(skip_all, fields(device = %message.source_uri()))]
    pub fn enroll(
        &self,
        message: &ProtocolMessage,
    ) -> Result<Result<(), DeviceManagementError>, SyncError> {
        let items = message
            .replace_items()
            .ok_or(SyncError::MissingSection {
                expected: REPLACE_SCHEMA.section(),
                found: message.body.section_name(),
            })?;
        let owner = message.source_name().unwrap_or_default();
        let record = extract_from_replace(items, owner, self.device_type)?;

        Ok(self.registry.enroll(&record))
    }

    /// Phase 2: attach the reported attributes to the stored record.
    ///
    /// Only a record with no properties at all is updated; anything already
    /// populated is left as is, even if the new answers differ.
    #[instrument(skip_all, fields(device = %message.source_uri()))]
    pub fn complete(&self, message: &ProtocolMessage) -> Result<PersistOutcome, SyncError> {
        let items = message
            .results_items()
            .ok_or(SyncError::MissingSection {
                expected: RESULTS_SCHEMA.section(),
                found: message.body.section_name(),
            })?;
        let reported = extract_from_results(items)?;

        let id = DeviceIdentifier::new(message.source_uri(), self.device_type);
        let mut existing = match self.registry.get_device(&id) {
            Ok(d) => d,
            Err(e) => return Ok(PersistOutcome::Failed(e)),
        };
        if existing.has_properties() {
            return Ok(PersistOutcome::Skipped);
        }

        for (property, value) in reported {
            existing.set_property(property, value);
        }
        existing.identifier = id.id;
        existing.device_type = id.device_type;

        Ok(match self.registry.modify_enrollment(&existing) {
            Ok(()) => PersistOutcome::Applied,
            Err(e) => PersistOutcome::Failed(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{LocationRef, SyncBody, SyncHeader};
    use crate::services::MockRegistry;

    fn items(values: &[&str]) -> Vec<Item> {
        values.iter().map(|v| Item::new(*v)).collect()
    }

    fn replace_msg() -> ProtocolMessage {
        ProtocolMessage::new(
            SyncHeader::new(1, 1, LocationRef::new("DEV-1").with_name("alice"))
                .with_credential("T1"),
            SyncBody::Replace(items(&["DEV-1", "Acme", "X100", "1.0", "en"])),
        )
    }

    fn results_msg() -> ProtocolMessage {
        ProtocolMessage::new(
            SyncHeader::new(1, 2, LocationRef::new("DEV-1").with_name("alice")),
            SyncBody::Results(items(&[
                "10.0", "IMSI1", "IMEI1", "DEV-1", "Acme Corp", "X100", "en", "Acme", "AA:BB",
                "1920x1080",
            ])),
        )
    }

    #[test]
    fn test_replace_builds_byod_record() {
        let msg = replace_msg();
        let record = extract_from_replace(msg.replace_items().unwrap(), "alice", "WINDOWS").unwrap();

        assert_eq!(record.identifier, "DEV-1");
        assert_eq!(record.device_type, "WINDOWS");
        assert_eq!(record.enrolment_info.owner, "alice");
        assert_eq!(record.enrolment_info.ownership, Ownership::Byod);
        assert_eq!(record.enrolment_info.status, EnrolmentStatus::Active);
        assert_eq!(record.property(DeviceProperty::OsVersion), Some("1.0"));
        assert_eq!(record.property(DeviceProperty::Vendor), Some("Acme"));
        assert_eq!(record.property(DeviceProperty::DeviceModel), Some("X100"));
        assert_eq!(record.property(DeviceProperty::Imsi), Some(""));
        assert_eq!(record.property(DeviceProperty::Imei), Some(""));
        assert_eq!(record.properties.len(), 5);
    }

    #[test]
    fn test_enroll_failure_is_recoverable() {
        let registry = MockRegistry::new();
        registry.fail_enroll(DeviceManagementError::Unavailable("down".into()));
        let extractor = ProfileExtractor::new(&registry, "WINDOWS");

        let outcome = extractor.enroll(&replace_msg()).unwrap();
        assert_eq!(
            outcome,
            Err(DeviceManagementError::Unavailable("down".into()))
        );
        assert_eq!(registry.enroll_calls().len(), 1);
    }

    #[test]
    fn test_enroll_requires_replace_section() {
        let registry = MockRegistry::new();
        let extractor = ProfileExtractor::new(&registry, "WINDOWS");

        let err = extractor.enroll(&results_msg()).unwrap_err();
        assert!(matches!(
            err,
            SyncError::MissingSection {
                expected: "Replace",
                found: "Results"
            }
        ));
        assert!(registry.calls().is_empty());
    }

    #[test]
    fn test_short_replace_is_fatal() {
        let registry = MockRegistry::new();
        let extractor = ProfileExtractor::new(&registry, "WINDOWS");
        let msg = ProtocolMessage::new(
            replace_msg().header,
            SyncBody::Replace(items(&["DEV-1", "Acme"])),
        );

        assert!(matches!(extractor.enroll(&msg), Err(SyncError::MissingItem(_))));
        assert!(registry.enroll_calls().is_empty());
    }

    #[test]
    fn test_complete_populates_empty_record() {
        let registry = MockRegistry::new();
        registry.insert_device(DeviceRecord::new("DEV-1", "WINDOWS"));
        let extractor = ProfileExtractor::new(&registry, "WINDOWS");

        assert_eq!(
            extractor.complete(&results_msg()).unwrap(),
            PersistOutcome::Applied
        );

        let modified = registry.modify_calls();
        assert_eq!(modified.len(), 1);
        let props = &modified[0].properties;
        assert_eq!(props.len(), 6);
        assert_eq!(props["IMEI"], "IMEI1");
        assert_eq!(props["OS_VERSION"], "10.0");
        assert_eq!(props["IMSI"], "IMSI1");
        assert_eq!(props["VENDOR"], "Acme");
        assert_eq!(props["MAC_ADDRESS"], "AA:BB");
        assert_eq!(props["DEVICE_INFO"], "1920x1080");
    }

    #[test]
    fn test_complete_leaves_populated_record() {
        let registry = MockRegistry::new();
        let mut stored = DeviceRecord::new("DEV-1", "WINDOWS");
        stored.set_property(DeviceProperty::Imei, "OLD");
        registry.insert_device(stored);
        let extractor = ProfileExtractor::new(&registry, "WINDOWS");

        assert_eq!(
            extractor.complete(&results_msg()).unwrap(),
            PersistOutcome::Skipped
        );
        assert!(registry.modify_calls().is_empty());
        assert_eq!(
            registry.device("DEV-1").unwrap().property(DeviceProperty::Imei),
            Some("OLD")
        );
    }

    #[test]
    fn test_complete_swallows_lookup_failure() {
        let registry = MockRegistry::new();
        let extractor = ProfileExtractor::new(&registry, "WINDOWS");

        let outcome = extractor.complete(&results_msg()).unwrap();
        assert!(matches!(
            outcome,
            PersistOutcome::Failed(DeviceManagementError::NotFound(_))
        ));
        assert!(registry.modify_calls().is_empty());
    }

    #[test]
    fn test_complete_swallows_modify_failure() {
        let registry = MockRegistry::new();
        registry.insert_device(DeviceRecord::new("DEV-1", "WINDOWS"));
        registry.fail_modify(DeviceManagementError::Storage("locked".into()));
        let extractor = ProfileExtractor::new(&registry, "WINDOWS");

        let outcome = extractor.complete(&results_msg()).unwrap();
        assert!(!outcome.is_applied());
        assert_eq!(registry.modify_calls().len(), 1);
    }
}
