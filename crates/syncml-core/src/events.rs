//! Event system for observability decoupling.
//!
//! Lets hosting layers subscribe to protocol events without tight coupling
//! to the dispatcher.

use crate::state::SessionPhase;

/// Log level for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Events emitted while handling a SyncML message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Phase chosen from (MsgID, SessionID).
    PhaseSelected {
        phase: SessionPhase,
        session_id: u32,
        msg_id: u32,
        device: String,
    },
    /// Enrollment token missing, unknown, or issued to someone else.
    AuthenticationFailed { user: String },
    /// Registry accepted a new enrollment.
    DeviceEnrolled { device: String },
    /// Registry rejected the enrollment; the handshake continues anyway.
    EnrollmentFailed { device: String, message: String },
    /// Phase-2 properties written to the registry.
    PropertiesUpdated { device: String, count: usize },
    /// Record already had properties, left untouched.
    PropertiesRetained { device: String },
    /// Phase-2 read or write failed; acknowledged anyway.
    ProfileUpdateFailed { device: String, message: String },
    /// Pending operations forwarded to the device.
    OperationsDelivered { device: String, count: usize },
    /// Request answered with a non-200 status.
    Rejected { status: u16 },
    /// Log message.
    Log { level: LogLevel, message: String },
}

/// Observer trait for receiving sync events.
pub trait SyncObserver: Send + Sync {
    /// Called when an event occurs.
    fn on_event(&self, event: &SyncEvent);
}

/// No-op observer that discards all events.
pub struct NullObserver;

impl SyncObserver for NullObserver {
    fn on_event(&self, _event: &SyncEvent) {}
}

/// Observer that logs events using tracing.
pub struct TracingObserver;

impl SyncObserver for TracingObserver {
    fn on_event(&self, event: &SyncEvent) {
        match event {
            SyncEvent::PhaseSelected {
                phase,
                session_id,
                msg_id,
                device,
            } => {
                tracing::debug!(phase = %phase, session_id, msg_id, device = %device, "Phase selected");
            }
            SyncEvent::AuthenticationFailed { user } => {
                tracing::error!(user = %user, "Authentication failure due to incorrect credentials");
            }
            SyncEvent::DeviceEnrolled { device } => {
                tracing::info!(device = %device, "Device enrolled");
            }
            SyncEvent::EnrollmentFailed { device, message } => {
                tracing::debug!(device = %device, "Failure occurred in enrolling device: {}", message);
            }
            SyncEvent::PropertiesUpdated { device, count } => {
                tracing::info!(device = %device, count, "Device properties updated");
            }
            SyncEvent::PropertiesRetained { device } => {
                tracing::debug!(device = %device, "Device already has properties, skipping update");
            }
            SyncEvent::ProfileUpdateFailed { device, message } => {
                tracing::error!(device = %device, "Enrollment modification fail: {}", message);
            }
            SyncEvent::OperationsDelivered { device, count } => {
                tracing::info!(device = %device, count, "Pending operations delivered");
            }
            SyncEvent::Rejected { status } => {
                tracing::warn!(status, "Request rejected");
            }
            SyncEvent::Log { level, message } => match level {
                LogLevel::Trace => tracing::trace!("{}", message),
                LogLevel::Debug => tracing::debug!("{}", message),
                LogLevel::Info => tracing::info!("{}", message),
                LogLevel::Warn => tracing::warn!("{}", message),
                LogLevel::Error => tracing::error!("{}", message),
            },
        }
    }
}

/// Observer that keeps every event, for assertions.
#[derive(Default)]
pub struct RecordingObserver {
    events: std::sync::Mutex<Vec<SyncEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl SyncObserver for RecordingObserver {
    fn on_event(&self, event: &SyncEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
