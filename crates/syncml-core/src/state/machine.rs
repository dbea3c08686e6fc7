//! Phase selection for the SyncML session state machine.
//!
//! No session state is kept in-process: the phase of each request is derived
//! from its (MsgID, SessionID) pair alone.

use std::fmt;

use crate::protocol::constants::*;

/// Phase of the enrollment / sync handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// First message of the first session: authenticate and enroll.
    EnrollInit,
    /// Second message of the first session: device answers the info requests.
    EnrollComplete,
    /// Any later session: deliver pending operations.
    PollPending,
    /// Sequencing outside the handshake.
    Unrecognized,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::EnrollInit => write!(f, "ENROLL_INIT"),
            SessionPhase::EnrollComplete => write!(f, "ENROLL_COMPLETE"),
            SessionPhase::PollPending => write!(f, "POLL_PENDING"),
            SessionPhase::Unrecognized => write!(f, "UNRECOGNIZED"),
        }
    }
}

impl SessionPhase {
    /// Select the phase for a message.
    pub fn select(msg_id: u32, session_id: u32) -> Self {
        match (msg_id, session_id) {
            (SYNCML_FIRST_MESSAGE, SESSION_ID_FIRST) => SessionPhase::EnrollInit,
            (SYNCML_SECOND_MESSAGE, SESSION_ID_FIRST) => SessionPhase::EnrollComplete,
            (_, s) if s >= SESSION_ID_SECOND => SessionPhase::PollPending,
            _ => SessionPhase::Unrecognized,
        }
    }

    /// Check if this phase belongs to the enrollment handshake.
    pub fn is_enrollment(&self) -> bool {
        matches!(self, SessionPhase::EnrollInit | SessionPhase::EnrollComplete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_phases() {
        assert_eq!(SessionPhase::select(1, 1), SessionPhase::EnrollInit);
        assert_eq!(SessionPhase::select(2, 1), SessionPhase::EnrollComplete);
        assert!(SessionPhase::select(2, 1).is_enrollment());
    }

    #[test]
    fn test_later_sessions_poll_regardless_of_msg_id() {
        for msg_id in [0, 1, 2, 5, u32::MAX] {
            assert_eq!(SessionPhase::select(msg_id, 2), SessionPhase::PollPending);
            assert_eq!(SessionPhase::select(msg_id, 3), SessionPhase::PollPending);
        }
    }

    #[test]
    fn test_unrecognized_sequencing() {
        for (msg_id, session_id) in [(0, 1), (3, 1), (7, 1), (1, 0), (2, 0), (9, 0)] {
            assert_eq!(
                SessionPhase::select(msg_id, session_id),
                SessionPhase::Unrecognized
            );
        }
        assert!(!SessionPhase::Unrecognized.is_enrollment());
    }
}
