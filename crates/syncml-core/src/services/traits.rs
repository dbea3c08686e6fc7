//! Collaborator abstractions.
//!
//! The dispatcher reaches the token cache, the device registry and the payload
//! codec only through these traits, so production backends and the in-crate
//! mocks are interchangeable. Implementations are shared between concurrent
//! device sessions and must be `Send + Sync`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::device::{DeviceIdentifier, DeviceRecord};
use crate::protocol::{Operation, ProtocolMessage};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceManagementError {
    #[error("Device not found: {0}")]
    NotFound(DeviceIdentifier),

    #[error("Device already enrolled: {0}")]
    AlreadyEnrolled(DeviceIdentifier),

    #[error("Registry unavailable: {0}")]
    Unavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationManagementError {
    #[error("Operation store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to load operations for {device}: {message}")]
    LoadFailed {
        device: DeviceIdentifier,
        message: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Malformed payload at line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("Missing {0} element")]
    MissingElement(&'static str),

    #[error("Serialization failed: {0}")]
    Serialize(String),
}

/// Entry stored against an issued enrollment token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub username: String,
}

/// Short-lived enrollment token cache. Consulted, never written, by this crate.
pub trait TokenCache: Send + Sync {
    fn lookup(&self, token: &str) -> Option<CacheEntry>;
}

/// Device management service.
pub trait DeviceRegistry: Send + Sync {
    /// Persist a new enrollment.
    fn enroll(&self, device: &DeviceRecord) -> Result<(), DeviceManagementError>;

    fn get_device(&self, id: &DeviceIdentifier) -> Result<DeviceRecord, DeviceManagementError>;

    fn modify_enrollment(&self, device: &DeviceRecord) -> Result<(), DeviceManagementError>;

    /// Operations queued for delivery, in queue order.
    fn get_pending_operations(
        &self,
        id: &DeviceIdentifier,
    ) -> Result<Vec<Operation>, OperationManagementError>;
}

/// SyncML payload codec.
pub trait PayloadCodec: Send + Sync {
    fn parse(&self, payload: &str) -> Result<ProtocolMessage, CodecError>;

    /// Build the server reply to `original` carrying `operations` (possibly none).
    fn generate_reply(
        &self,
        original: &ProtocolMessage,
        operations: &[Operation],
    ) -> Result<ProtocolMessage, CodecError>;

    fn serialize(&self, message: &ProtocolMessage) -> Result<String, CodecError>;
}
