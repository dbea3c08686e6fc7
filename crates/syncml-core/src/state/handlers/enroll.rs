//! ENROLL_INIT - first contact from a device.

use crate::auth::EnrollmentAuthenticator;
use crate::catalog::build_info_request;
use crate::error::SyncError;
use crate::events::{SyncEvent, SyncObserver};
use crate::profile::ProfileExtractor;
use crate::protocol::constants::STATUS_UNAUTHORIZED;
use crate::services::{DeviceRegistry, TokenCache};
use tracing::{debug, info};

use super::{HandleResult, HandlerContext};

/// Authenticate, enroll with phase-1 identity, then request the remaining
/// attributes.
///
/// The catalog is sent even when the registry refuses the enrollment.
pub fn handle_enroll_init<R, C, O>(
    ctx: &HandlerContext<'_, R, C, O>,
) -> Result<HandleResult, SyncError>
where
    R: DeviceRegistry + ?Sized,
    C: TokenCache + ?Sized,
    O: SyncObserver + ?Sized,
{
    let user = ctx.message.source_name();
    let auth = EnrollmentAuthenticator::new(ctx.cache);
    if let Err(reason) = auth.verify(ctx.message.credential_data(), user) {
        debug!(reason = %reason, "Enrollment token rejected");
        ctx.emit(SyncEvent::AuthenticationFailed {
            user: user.unwrap_or_default().to_string(),
        });
        return Ok(HandleResult::Reject(STATUS_UNAUTHORIZED));
    }

    let extractor = ProfileExtractor::new(ctx.registry, &ctx.device.device_type);
    match extractor.enroll(ctx.message)? {
        Ok(()) => {
            info!(device = %ctx.device.id, user = ?user, "ENROLL_INIT: device enrolled");
            ctx.emit(SyncEvent::DeviceEnrolled {
                device: ctx.device.id.clone(),
            });
        }
        Err(e) => {
            ctx.emit(SyncEvent::EnrollmentFailed {
                device: ctx.device.id.clone(),
                message: e.to_string(),
            });
        }
    }

    Ok(HandleResult::Reply(build_info_request()))
}
