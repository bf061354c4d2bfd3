//! Display session state transitions
//!
//! Every session state change goes through [`next_state`].

use nekopaw_protocol::SessionState;

/// Requests that move the session between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayEvent {
    ShowText,
    ShowBitmap,
    ShowConfirm,
    /// Confirmation accepted or declined
    Resolve,
    /// Explicit clear
    Clear,
    /// TTL or confirm timeout elapsed
    Expire,
}

/// Process an event and return the next state
///
/// Returns `None` when the event is not allowed in `state`. A pending
/// confirmation blocks all new content until it is resolved or cleared.
pub fn next_state(state: SessionState, event: DisplayEvent) -> Option<SessionState> {
    use DisplayEvent::*;
    use SessionState::*;

    match (state, event) {
        (ConfirmPending, ShowText | ShowBitmap | ShowConfirm) => None,
        (_, ShowText) => Some(ShowingText),
        (_, ShowBitmap) => Some(ShowingBitmap),
        (_, ShowConfirm) => Some(ConfirmPending),

        (ConfirmPending, Resolve) => Some(Idle),
        (_, Resolve) => None,

        // Clear is accepted everywhere, including Idle
        (_, Clear) => Some(Idle),

        (Idle, Expire) => None,
        (_, Expire) => Some(Idle),
    }
}
