//! Phase handlers - dispatch logic for each session phase.
//!
//! This module is split into submodules by phase:
//! - `enroll`: first contact, authentication and enrollment
//! - `complete`: enrollment completion from the device's Results
//! - `poll`: pending-operation delivery

mod complete;
mod enroll;
mod poll;

use crate::device::DeviceIdentifier;
use crate::error::SyncError;
use crate::events::{LogLevel, SyncEvent, SyncObserver};
use crate::protocol::constants::STATUS_BAD_REQUEST;
use crate::protocol::{Operation, ProtocolMessage};
use crate::services::{DeviceRegistry, TokenCache};
use crate::state::machine::SessionPhase;
use tracing::warn;

use complete::handle_enroll_complete;
use enroll::handle_enroll_init;
use poll::handle_poll_pending;

/// Result of handling one message.
///
/// Fatal outcomes are the `Err` side of [`handle_phase`]; everything here is
/// answered to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleResult {
    /// Status 200 with a reply carrying these operations (possibly none).
    Reply(Vec<Operation>),
    /// Non-200 status with the generic rejection body.
    Reject(u16),
}

/// Handler context containing all resources for one request.
pub struct HandlerContext<'a, R, C, O>
where
    R: DeviceRegistry + ?Sized,
    C: TokenCache + ?Sized,
    O: SyncObserver + ?Sized,
{
    pub registry: &'a R,
    pub cache: &'a C,
    pub observer: &'a O,
    pub message: &'a ProtocolMessage,
    /// Identifier derived from the header's `Source/LocURI`.
    pub device: DeviceIdentifier,
}

impl<'a, R, C, O> HandlerContext<'a, R, C, O>
where
    R: DeviceRegistry + ?Sized,
    C: TokenCache + ?Sized,
    O: SyncObserver + ?Sized,
{
    pub(crate) fn emit(&self, event: SyncEvent) {
        self.observer.on_event(&event);
    }

    pub(crate) fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.emit(SyncEvent::Log {
            level,
            message: message.into(),
        });
    }
}

/// Handle a message in the given phase.
pub fn handle_phase<R, C, O>(
    phase: SessionPhase,
    ctx: &HandlerContext<'_, R, C, O>,
) -> Result<HandleResult, SyncError>
where
    R: DeviceRegistry + ?Sized,
    C: TokenCache + ?Sized,
    O: SyncObserver + ?Sized,
{
    ctx.emit(SyncEvent::PhaseSelected {
        phase,
        session_id: ctx.message.session_id(),
        msg_id: ctx.message.msg_id(),
        device: ctx.device.id.clone(),
    });

    match phase {
        SessionPhase::EnrollInit => handle_enroll_init(ctx),
        SessionPhase::EnrollComplete => handle_enroll_complete(ctx),
        SessionPhase::PollPending => handle_poll_pending(ctx),
        SessionPhase::Unrecognized => {
            warn!(
                session_id = ctx.message.session_id(),
                msg_id = ctx.message.msg_id(),
                "Unrecognized message sequencing"
            );
            ctx.log(
                LogLevel::Debug,
                format!(
                    "No phase for MsgID {} in SessionID {}",
                    ctx.message.msg_id(),
                    ctx.message.session_id()
                ),
            );
            Ok(HandleResult::Reject(STATUS_BAD_REQUEST))
        }
    }
}
