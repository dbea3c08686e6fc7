//! In-memory collaborators for testing and fixture replay.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use super::traits::{
    CacheEntry, DeviceManagementError, DeviceRegistry, OperationManagementError, TokenCache,
};
use crate::device::{DeviceIdentifier, DeviceRecord};
use crate::protocol::Operation;

/// Token cache backed by a map.
#[derive(Default)]
pub struct InMemoryTokenCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `token` as issued to `username`.
    pub fn insert(&self, token: impl Into<String>, username: impl Into<String>) {
        self.entries.write().unwrap().insert(
            token.into(),
            CacheEntry {
                username: username.into(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TokenCache for InMemoryTokenCache {
    fn lookup(&self, token: &str) -> Option<CacheEntry> {
        self.entries.read().unwrap().get(token).cloned()
    }
}

/// A call observed by [`MockRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    Enroll(DeviceRecord),
    GetDevice(DeviceIdentifier),
    ModifyEnrollment(DeviceRecord),
    GetPendingOperations(DeviceIdentifier),
}

#[derive(Debug, Default)]
struct InjectedFailures {
    enroll: Option<DeviceManagementError>,
    get_device: Option<DeviceManagementError>,
    modify: Option<DeviceManagementError>,
    pending: Option<OperationManagementError>,
}

/// Mock device registry with a call journal and failure injection.
///
/// Enrollment stores identity and enrolment info only; vendor properties are
/// attached later through `modify_enrollment`. Call
/// [`MockRegistry::retain_enrolled_properties`] to keep them on enroll.
pub struct MockRegistry {
    devices: Arc<Mutex<HashMap<String, DeviceRecord>>>,
    pending: Arc<Mutex<HashMap<String, Vec<Operation>>>>,
    calls: Arc<Mutex<Vec<RegistryCall>>>,
    failures: Arc<Mutex<InjectedFailures>>,
    retain_properties: bool,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            devices: Arc::new(Mutex::new(HashMap::new())),
            pending: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(InjectedFailures::default())),
            retain_properties: false,
        }
    }

    pub fn retain_enrolled_properties(mut self, retain: bool) -> Self {
        self.retain_properties = retain;
        self
    }

    /// Seed a stored device.
    pub fn insert_device(&self, record: DeviceRecord) {
        self.devices
            .lock()
            .unwrap()
            .insert(record.identifier.clone(), record);
    }

    /// Current stored snapshot of a device.
    pub fn device(&self, id: &str) -> Option<DeviceRecord> {
        self.devices.lock().unwrap().get(id).cloned()
    }

    /// Queue an operation for delivery to `device_id`.
    pub fn queue_operation(&self, device_id: impl Into<String>, op: Operation) {
        self.pending
            .lock()
            .unwrap()
            .entry(device_id.into())
            .or_default()
            .push(op);
    }

    pub fn fail_enroll(&self, err: DeviceManagementError) {
        self.failures.lock().unwrap().enroll = Some(err);
    }

    pub fn fail_get_device(&self, err: DeviceManagementError) {
        self.failures.lock().unwrap().get_device = Some(err);
    }

    pub fn fail_modify(&self, err: DeviceManagementError) {
        self.failures.lock().unwrap().modify = Some(err);
    }

    pub fn fail_pending(&self, err: OperationManagementError) {
        self.failures.lock().unwrap().pending = Some(err);
    }

    pub fn clear_failures(&self) {
        *self.failures.lock().unwrap() = InjectedFailures::default();
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn enroll_calls(&self) -> Vec<DeviceRecord> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RegistryCall::Enroll(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    pub fn modify_calls(&self) -> Vec<DeviceRecord> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RegistryCall::ModifyEnrollment(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    pub fn pending_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RegistryCall::GetPendingOperations(_)))
            .count()
    }

    fn record(&self, call: RegistryCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceRegistry for MockRegistry {
    fn enroll(&self, device: &DeviceRecord) -> Result<(), DeviceManagementError> {
        self.record(RegistryCall::Enroll(device.clone()));
        if let Some(err) = self.failures.lock().unwrap().enroll.clone() {
            return Err(err);
        }

        // Re-enrollment refreshes ownership and keeps what was stored.
        self.devices
            .lock()
            .unwrap()
            .entry(device.identifier.clone())
            .and_modify(|existing| existing.enrolment_info = device.enrolment_info.clone())
            .or_insert_with(|| {
                let mut stored = device.clone();
                if !self.retain_properties {
                    stored.properties.clear();
                }
                stored
            });
        Ok(())
    }

    fn get_device(&self, id: &DeviceIdentifier) -> Result<DeviceRecord, DeviceManagementError> {
        self.record(RegistryCall::GetDevice(id.clone()));
        if let Some(err) = self.failures.lock().unwrap().get_device.clone() {
            return Err(err);
        }
        self.devices
            .lock()
            .unwrap()
            .get(&id.id)
            .filter(|d| d.device_type == id.device_type)
            .cloned()
            .ok_or_else(|| DeviceManagementError::NotFound(id.clone()))
    }

    fn modify_enrollment(&self, device: &DeviceRecord) -> Result<(), DeviceManagementError> {
        self.record(RegistryCall::ModifyEnrollment(device.clone()));
        if let Some(err) = self.failures.lock().unwrap().modify.clone() {
            return Err(err);
        }

        let mut devices = self.devices.lock().unwrap();
        if !devices.contains_key(&device.identifier) {
            return Err(DeviceManagementError::NotFound(device.key()));
        }
        devices.insert(device.identifier.clone(), device.clone());
        Ok(())
    }

    fn get_pending_operations(
        &self,
        id: &DeviceIdentifier,
    ) -> Result<Vec<Operation>, OperationManagementError> {
        self.record(RegistryCall::GetPendingOperations(id.clone()));
        if let Some(err) = self.failures.lock().unwrap().pending.clone() {
            return Err(err);
        }
        Ok(self
            .pending
            .lock()
            .unwrap()
            .get(&id.id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windows(id: &str) -> DeviceIdentifier {
        DeviceIdentifier::new(id, "WINDOWS")
    }

    #[test]
    fn test_token_cache_lookup() {
        let cache = InMemoryTokenCache::new();
        cache.insert("T1", "alice");

        assert_eq!(cache.lookup("T1").unwrap().username, "alice");
        assert!(cache.lookup("T2").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_enroll_drops_properties_by_default() {
        let registry = MockRegistry::new();
        let mut record = DeviceRecord::new("DEV-1", "WINDOWS");
        record
            .properties
            .insert("OS_VERSION".to_string(), "1.0".to_string());

        registry.enroll(&record).unwrap();
        assert!(!registry.device("DEV-1").unwrap().has_properties());

        let retaining = MockRegistry::new().retain_enrolled_properties(true);
        retaining.enroll(&record).unwrap();
        assert!(retaining.device("DEV-1").unwrap().has_properties());
    }

    #[test]
    fn test_pending_operations_are_not_drained() {
        let registry = MockRegistry::new();
        registry.queue_operation("DEV-1", Operation::info("A"));
        registry.queue_operation("DEV-1", Operation::info("B"));

        let first = registry.get_pending_operations(&windows("DEV-1")).unwrap();
        let second = registry.get_pending_operations(&windows("DEV-1")).unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].code, "A");
        assert_eq!(registry.pending_calls(), 2);
    }

    #[test]
    fn test_injected_failure_is_journaled() {
        let registry = MockRegistry::new();
        registry.fail_modify(DeviceManagementError::Storage("disk full".into()));

        let record = DeviceRecord::new("DEV-1", "WINDOWS");
        assert!(registry.modify_enrollment(&record).is_err());
        assert_eq!(registry.modify_calls().len(), 1);

        registry.clear_failures();
        assert_eq!(
            registry.modify_enrollment(&record),
            Err(DeviceManagementError::NotFound(windows("DEV-1")))
        );
    }

    #[test]
    fn test_get_device_checks_type() {
        let registry = MockRegistry::new();
        registry.insert_device(DeviceRecord::new("DEV-1", "WINDOWS"));

        assert!(registry.get_device(&windows("DEV-1")).is_ok());
        assert!(
            registry
                .get_device(&DeviceIdentifier::new("DEV-1", "ANDROID"))
                .is_err()
        );
    }
}
