//! POLL_PENDING - steady-state sessions.

use crate::error::SyncError;
use crate::events::{LogLevel, SyncEvent, SyncObserver};
use crate::services::{DeviceRegistry, TokenCache};
use tracing::error;

use super::{HandleResult, HandlerContext};

/// Forward the device's pending operations in queue order.
///
/// Unlike the enrollment phases, a registry failure here fails the request.
pub fn handle_poll_pending<R, C, O>(
    ctx: &HandlerContext<'_, R, C, O>,
) -> Result<HandleResult, SyncError>
where
    R: DeviceRegistry + ?Sized,
    C: TokenCache + ?Sized,
    O: SyncObserver + ?Sized,
{
    let operations = ctx
        .registry
        .get_pending_operations(&ctx.device)
        .map_err(|e| {
            error!(device = %ctx.device, error = %e, "Cannot access operation management service");
            ctx.log(LogLevel::Error, format!("Pending operations unavailable: {e}"));
            SyncError::OperationManagement(e)
        })?;

    ctx.emit(SyncEvent::OperationsDelivered {
        device: ctx.device.id.clone(),
        count: operations.len(),
    });
    Ok(HandleResult::Reply(operations))
}
