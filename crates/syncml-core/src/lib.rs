//! SyncML-Core: server-side SyncML session handling for Windows device enrollment.
//!
//! This crate answers the messages a device sends during the OMA-DM style
//! enrollment handshake and the polling sessions that follow it.
//!
//! # Architecture
//!
//! The crate is organized into layers:
//!
//! - **Protocol**: Message model, operations, positional item schemas
//! - **Services**: Token cache, device registry and codec abstractions (plus mocks)
//! - **State**: Phase selection and per-phase handlers
//! - **Auth / Profile / Catalog**: Enrollment authentication, device profile
//!   extraction, information-request catalog
//! - **Events**: Observer pattern for logging decoupling
//! - **Session**: Top-level dispatcher
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use syncml_core::services::{InMemoryTokenCache, LineCodec, MockRegistry};
//! use syncml_core::session::{ServiceConfig, SyncmlService};
//!
//! let cache = Arc::new(InMemoryTokenCache::new());
//! cache.insert("T1", "alice");
//!
//! let service = SyncmlService::new(
//!     ServiceConfig::default(),
//!     Arc::new(MockRegistry::new()),
//!     cache,
//!     Arc::new(LineCodec::new()),
//! );
//! let response = service
//!     .handle_raw("SessionID: 2\nMsgID: 1\nSource: DEV-1")
//!     .expect("request failed");
//! assert_eq!(response.status, 200);
//! ```

pub mod auth;
pub mod catalog;
pub mod device;
pub mod error;
pub mod events;
pub mod profile;
pub mod protocol;
pub mod services;
pub mod session;
pub mod state;

// Re-exports for convenience
pub use auth::{AuthFailure, EnrollmentAuthenticator};
pub use catalog::{INFO_CATALOG, InfoRequest, build_info_request};
pub use device::{
    DeviceIdentifier, DeviceProperty, DeviceRecord, EnrolmentInfo, EnrolmentStatus, Ownership,
};
pub use error::SyncError;
pub use events::{LogLevel, NullObserver, SyncEvent, SyncObserver, TracingObserver};
pub use profile::{PersistOutcome, ProfileExtractor};
pub use protocol::{Item, Operation, OperationKind, ProtocolMessage, SyncBody, SyncHeader};
pub use services::{DeviceRegistry, PayloadCodec, TokenCache};
pub use session::{ServiceConfig, SyncResponse, SyncmlService};
pub use state::SessionPhase;
