//! Fatal request errors.
//!
//! Anything returned as `Err(SyncError)` aborts the request without a reply.
//! Recoverable registry failures during enrollment never reach this type; they
//! surface as a nested `DeviceManagementError` from
//! [`ProfileExtractor::enroll`](crate::profile::ProfileExtractor::enroll) or as
//! [`PersistOutcome::Failed`](crate::profile::PersistOutcome).

use thiserror::Error;

use crate::protocol::SchemaError;
use crate::services::{CodecError, OperationManagementError};

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Expected {expected} section, found {found}")]
    MissingSection {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Malformed payload: {0}")]
    MissingItem(#[from] SchemaError),

    #[error("Cannot access operation management service")]
    OperationManagement(#[source] OperationManagementError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}
