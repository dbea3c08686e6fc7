//! SyncML service - top-level dispatcher for inbound device messages.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::device::DeviceIdentifier;
use crate::error::SyncError;
use crate::events::{SyncEvent, SyncObserver, TracingObserver};
use crate::protocol::ProtocolMessage;
use crate::protocol::constants::{AUTHENTICATION_FAILURE, DEVICE_TYPE_WINDOWS, STATUS_OK};
use crate::services::{DeviceRegistry, PayloadCodec, TokenCache};
use crate::state::handlers::{HandleResult, HandlerContext, handle_phase};
use crate::state::machine::SessionPhase;

fn default_device_type() -> String {
    DEVICE_TYPE_WINDOWS.to_string()
}

/// Configuration for the SyncML service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Type stamped on every device identifier and enrolled record.
    #[serde(default = "default_device_type")]
    pub device_type: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            device_type: default_device_type(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ServiceConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Status and body handed back to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResponse {
    pub status: u16,
    pub body: String,
}

impl SyncResponse {
    pub fn ok(body: String) -> Self {
        Self {
            status: STATUS_OK,
            body,
        }
    }

    /// Non-200 answer. 400 and 401 share the same body on the wire.
    pub fn rejected(status: u16) -> Self {
        Self {
            status,
            body: AUTHENTICATION_FAILURE.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// SyncML service - answers one device message per call.
///
/// Holds no per-device state; the phase is derived from each message.
pub struct SyncmlService<R, C, P, O = TracingObserver>
where
    R: DeviceRegistry,
    C: TokenCache,
    P: PayloadCodec,
    O: SyncObserver,
{
    config: ServiceConfig,
    registry: Arc<R>,
    cache: Arc<C>,
    codec: Arc<P>,
    observer: Arc<O>,
}

impl<R, C, P> SyncmlService<R, C, P, TracingObserver>
where
    R: DeviceRegistry,
    C: TokenCache,
    P: PayloadCodec,
{
    /// Create a new service with default tracing observer.
    pub fn new(config: ServiceConfig, registry: Arc<R>, cache: Arc<C>, codec: Arc<P>) -> Self {
        Self::with_observer(config, registry, cache, codec, Arc::new(TracingObserver))
    }
}

impl<R, C, P, O> SyncmlService<R, C, P, O>
where
    R: DeviceRegistry,
    C: TokenCache,
    P: PayloadCodec,
    O: SyncObserver,
{
    /// Create a new service with a custom observer.
    pub fn with_observer(
        config: ServiceConfig,
        registry: Arc<R>,
        cache: Arc<C>,
        codec: Arc<P>,
        observer: Arc<O>,
    ) -> Self {
        Self {
            config,
            registry,
            cache,
            codec,
            observer,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Parse a raw payload with the codec, then [`handle`](Self::handle) it.
    pub fn handle_raw(&self, payload: &str) -> Result<SyncResponse, SyncError> {
        let message = self.codec.parse(payload)?;
        self.handle(&message)
    }

    /// Handle one parsed message.
    ///
    /// `Err` means the request failed outright and no response should be sent.
    #[instrument(skip_all, fields(session_id = message.session_id(), msg_id = message.msg_id()))]
    pub fn handle(&self, message: &ProtocolMessage) -> Result<SyncResponse, SyncError> {
        let phase = SessionPhase::select(message.msg_id(), message.session_id());
        let ctx = HandlerContext {
            registry: self.registry.as_ref(),
            cache: self.cache.as_ref(),
            observer: self.observer.as_ref(),
            message,
            device: DeviceIdentifier::new(message.source_uri(), self.config.device_type.clone()),
        };

        match handle_phase(phase, &ctx)? {
            HandleResult::Reply(operations) => {
                let reply = self.codec.generate_reply(message, &operations)?;
                let body = self.codec.serialize(&reply)?;
                Ok(SyncResponse::ok(body))
            }
            HandleResult::Reject(status) => {
                self.observer.on_event(&SyncEvent::Rejected { status });
                Ok(SyncResponse::rejected(status))
            }
        }
    }
}
