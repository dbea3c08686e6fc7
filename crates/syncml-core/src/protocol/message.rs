//! Structured SyncML message model.
//!
//! This is the parsed form of a payload; the XML grammar itself belongs to the
//! codec. A message is immutable once parsed and is owned by the dispatcher for
//! the duration of one request.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::operation::Operation;

/// Source or target location of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    /// `LocURI` - the device identifier for device-originated messages.
    pub loc_uri: String,
    /// `LocName` - the claimed owner of the device.
    #[serde(default)]
    pub loc_name: Option<String>,
}

impl LocationRef {
    pub fn new(loc_uri: impl Into<String>) -> Self {
        Self {
            loc_uri: loc_uri.into(),
            loc_name: None,
        }
    }

    pub fn with_name(mut self, loc_name: impl Into<String>) -> Self {
        self.loc_name = Some(loc_name.into());
        self
    }
}

/// Credential element of the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Opaque enrollment token.
    pub data: String,
}

/// SyncHdr.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncHeader {
    pub session_id: u32,
    pub msg_id: u32,
    pub source: LocationRef,
    #[serde(default)]
    pub target: Option<LocationRef>,
    #[serde(default)]
    pub credential: Option<Credential>,
}

impl SyncHeader {
    pub fn new(session_id: u32, msg_id: u32, source: LocationRef) -> Self {
        Self {
            session_id,
            msg_id,
            source,
            target: None,
            credential: None,
        }
    }

    pub fn with_target(mut self, target: LocationRef) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_credential(mut self, data: impl Into<String>) -> Self {
        self.credential = Some(Credential { data: data.into() });
        self
    }
}

/// A single positional item. Items carry no field names, only order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub data: String,
}

impl Item {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// SyncBody. Exactly one kind is populated per message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncBody {
    /// Device information pushed by the device on first contact.
    Replace(Vec<Item>),
    /// Answers to information-request operations.
    Results(Vec<Item>),
    /// Operations sent from server to device.
    Operations(Vec<Operation>),
    #[default]
    Empty,
}

impl SyncBody {
    /// Section name as it appears on the wire.
    pub fn section_name(&self) -> &'static str {
        match self {
            SyncBody::Replace(_) => "Replace",
            SyncBody::Results(_) => "Results",
            SyncBody::Operations(_) => "Operations",
            SyncBody::Empty => "Empty",
        }
    }
}

impl fmt::Display for SyncBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section_name())
    }
}

/// A parsed SyncML document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolMessage {
    pub header: SyncHeader,
    pub body: SyncBody,
}

impl ProtocolMessage {
    pub fn new(header: SyncHeader, body: SyncBody) -> Self {
        Self { header, body }
    }

    pub fn session_id(&self) -> u32 {
        self.header.session_id
    }

    pub fn msg_id(&self) -> u32 {
        self.header.msg_id
    }

    /// Device identifier (`Source/LocURI`).
    pub fn source_uri(&self) -> &str {
        &self.header.source.loc_uri
    }

    /// Claimed owner (`Source/LocName`).
    pub fn source_name(&self) -> Option<&str> {
        self.header.source.loc_name.as_deref()
    }

    /// Enrollment token carried in `Cred/Data`.
    pub fn credential_data(&self) -> Option<&str> {
        self.header.credential.as_ref().map(|c| c.data.as_str())
    }

    pub fn replace_items(&self) -> Option<&[Item]> {
        match &self.body {
            SyncBody::Replace(items) => Some(items),
            _ => None,
        }
    }

    pub fn results_items(&self) -> Option<&[Item]> {
        match &self.body {
            SyncBody::Results(items) => Some(items),
            _ => None,
        }
    }

    pub fn operations(&self) -> Option<&[Operation]> {
        match &self.body {
            SyncBody::Operations(ops) => Some(ops),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_accessors() {
        let header = SyncHeader::new(1, 1, LocationRef::new("DEV-1").with_name("alice"))
            .with_credential("T1");
        let msg = ProtocolMessage::new(header, SyncBody::Replace(vec![Item::new("DEV-1")]));

        assert_eq!(msg.source_uri(), "DEV-1");
        assert_eq!(msg.source_name(), Some("alice"));
        assert_eq!(msg.credential_data(), Some("T1"));
        assert_eq!(msg.replace_items().map(|i| i.len()), Some(1));
        assert!(msg.results_items().is_none());
    }

    #[test]
    fn test_missing_name_is_none() {
        let msg = ProtocolMessage::new(
            SyncHeader::new(2, 1, LocationRef::new("DEV-2")),
            SyncBody::Empty,
        );
        assert!(msg.source_name().is_none());
        assert!(msg.credential_data().is_none());
    }
}
