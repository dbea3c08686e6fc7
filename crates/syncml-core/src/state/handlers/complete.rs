//! ENROLL_COMPLETE - device answers the information requests.

use crate::error::SyncError;
use crate::events::{SyncEvent, SyncObserver};
use crate::profile::{PersistOutcome, ProfileExtractor};
use crate::protocol::RESULTS_SCHEMA;
use crate::services::{DeviceRegistry, TokenCache};
use tracing::info;

use super::{HandleResult, HandlerContext};

/// Fill in the stored record's properties and acknowledge.
///
/// Registry failures are reported and swallowed; the device always gets a
/// plain acknowledgment.
pub fn handle_enroll_complete<R, C, O>(
    ctx: &HandlerContext<'_, R, C, O>,
) -> Result<HandleResult, SyncError>
where
    R: DeviceRegistry + ?Sized,
    C: TokenCache + ?Sized,
    O: SyncObserver + ?Sized,
{
    let extractor = ProfileExtractor::new(ctx.registry, &ctx.device.device_type);
    let device = ctx.device.id.clone();

    match extractor.complete(ctx.message)? {
        PersistOutcome::Applied => {
            info!(device = %device, "ENROLL_COMPLETE: properties stored");
            ctx.emit(SyncEvent::PropertiesUpdated {
                device,
                count: RESULTS_SCHEMA.fields().len(),
            });
        }
        PersistOutcome::Skipped => ctx.emit(SyncEvent::PropertiesRetained { device }),
        PersistOutcome::Failed(e) => ctx.emit(SyncEvent::ProfileUpdateFailed {
            device,
            message: e.to_string(),
        }),
    }

    Ok(HandleResult::Reply(Vec::new()))
}
