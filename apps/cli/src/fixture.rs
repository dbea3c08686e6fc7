//! Replay fixtures: seeded collaborators plus a sequence of device messages.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use syncml_core::protocol::{Item, LocationRef, ProtocolMessage, SyncBody, SyncHeader};
use syncml_core::services::{InMemoryTokenCache, MockRegistry};
use syncml_core::{DeviceRecord, Operation, ServiceConfig};

#[derive(Debug, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub tokens: Vec<TokenFixture>,
    #[serde(default)]
    pub devices: Vec<DeviceRecord>,
    #[serde(default)]
    pub pending: Vec<PendingFixture>,
    #[serde(default)]
    pub requests: Vec<RequestFixture>,
}

#[derive(Debug, Deserialize)]
pub struct TokenFixture {
    pub token: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct PendingFixture {
    pub device: String,
    pub operations: Vec<Operation>,
}

/// One device message. At most one of `replace` / `results` may be set.
#[derive(Debug, Deserialize)]
pub struct RequestFixture {
    pub session_id: u32,
    pub msg_id: u32,
    pub source: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub credential: Option<String>,
    #[serde(default)]
    pub replace: Option<Vec<String>>,
    #[serde(default)]
    pub results: Option<Vec<String>>,
}

impl Fixture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading fixture {}", path.display()))?;
        let fixture: Fixture = toml::from_str(&content)
            .with_context(|| format!("parsing fixture {}", path.display()))?;
        Ok(fixture)
    }

    pub fn token_cache(&self) -> InMemoryTokenCache {
        let cache = InMemoryTokenCache::new();
        for t in &self.tokens {
            cache.insert(t.token.clone(), t.username.clone());
        }
        cache
    }

    pub fn registry(&self, retain_properties: bool) -> MockRegistry {
        let registry = MockRegistry::new().retain_enrolled_properties(retain_properties);
        for device in &self.devices {
            registry.insert_device(device.clone());
        }
        for p in &self.pending {
            for op in &p.operations {
                registry.queue_operation(p.device.clone(), op.clone());
            }
        }
        registry
    }
}

fn to_items(values: &[String]) -> Vec<Item> {
    values.iter().map(|v| Item::new(v.clone())).collect()
}

impl RequestFixture {
    pub fn to_message(&self) -> Result<ProtocolMessage> {
        let body = match (&self.replace, &self.results) {
            (Some(_), Some(_)) => bail!(
                "request {}/{} sets both replace and results",
                self.session_id,
                self.msg_id
            ),
            (Some(items), None) => SyncBody::Replace(to_items(items)),
            (None, Some(items)) => SyncBody::Results(to_items(items)),
            (None, None) => SyncBody::Empty,
        };

        let mut source = LocationRef::new(self.source.clone());
        source.loc_name = self.name.clone();
        let mut header = SyncHeader::new(self.session_id, self.msg_id, source);
        if let Some(cred) = &self.credential {
            header = header.with_credential(cred.clone());
        }
        Ok(ProtocolMessage::new(header, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syncml_core::TokenCache;

    const DEMO: &str = include_str!("../../../demos/enrollment.toml");

    #[test]
    fn test_demo_fixture_loads() {
        let fixture: Fixture = toml::from_str(DEMO).unwrap();
        assert_eq!(fixture.requests.len(), 5);
        assert_eq!(fixture.service.device_type, "WINDOWS");
        assert_eq!(fixture.token_cache().lookup("T1").unwrap().username, "alice");

        let complete = fixture.requests[2].to_message().unwrap();
        assert_eq!(complete.results_items().unwrap().len(), 10);
        assert_eq!(complete.source_name(), Some("alice"));
    }

    #[test]
    fn test_both_sections_rejected() {
        let request = RequestFixture {
            session_id: 1,
            msg_id: 1,
            source: "DEV-1".to_string(),
            name: None,
            credential: None,
            replace: Some(vec![]),
            results: Some(vec![]),
        };
        assert!(request.to_message().is_err());
    }
}
