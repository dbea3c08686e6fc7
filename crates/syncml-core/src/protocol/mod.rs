//! Protocol module - SyncML message model and positional layouts.

pub mod constants;
pub mod message;
pub mod operation;
pub mod schema;

pub use constants::*;
pub use message::{Credential, Item, LocationRef, ProtocolMessage, SyncBody, SyncHeader};
pub use operation::{Operation, OperationKind};
pub use schema::{Decoded, ItemSchema, REPLACE_SCHEMA, RESULTS_SCHEMA, ReplaceField, SchemaError};
