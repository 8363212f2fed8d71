// ABOUTME: The SMPP session lifecycle states and their capability checks
// ABOUTME: CLOSED through CONNECTING/OPEN/BINDING to the three bound modes and teardown

use std::fmt;

/// SMPP session lifecycle (Section 2.1 of the specification).
///
/// ```text
/// CLOSED -> CONNECTING -> OPEN -> BINDING -> BOUND_TX/RX/TRX
///                                              |        \
///                                         UNBINDING   RECONNECTING
///                                              \         /
///                                               CLOSED--
/// ```
///
/// Outbound submissions are legal only in `BoundTx`/`BoundTrx`; inbound
/// deliveries are processed only in `BoundRx`/`BoundTrx`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Closed,
    Connecting,
    Open,
    Binding,
    BoundTx,
    BoundRx,
    BoundTrx,
    Unbinding,
    Reconnecting,
}

impl SessionState {
    /// submit_sm is allowed
    pub fn can_transmit(&self) -> bool {
        matches!(self, SessionState::BoundTx | SessionState::BoundTrx)
    }

    /// deliver_sm is processed rather than rejected
    pub fn can_receive(&self) -> bool {
        matches!(self, SessionState::BoundRx | SessionState::BoundTrx)
    }

    pub fn is_bound(&self) -> bool {
        matches!(
            self,
            SessionState::BoundTx | SessionState::BoundRx | SessionState::BoundTrx
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Closed => "CLOSED",
            SessionState::Connecting => "CONNECTING",
            SessionState::Open => "OPEN",
            SessionState::Binding => "BINDING",
            SessionState::BoundTx => "BOUND_TX",
            SessionState::BoundRx => "BOUND_RX",
            SessionState::BoundTrx => "BOUND_TRX",
            SessionState::Unbinding => "UNBINDING",
            SessionState::Reconnecting => "RECONNECTING",
        };
        f.write_str(name)
    }
}
