//! Display session management
//!
//! Text, bitmap and confirmation flows on top of a single
//! [`DisplayAdapter`](crate::traits::DisplayAdapter).

pub mod content;
pub mod session;
pub mod state;

pub use content::Snapshot;
pub use session::{
    effective_refresh, ConfirmOutcome, ConfirmTicket, DisplayExpiry, DisplaySession,
    CONFIRM_HISTORY_LEN,
};
pub use state::{next_state, DisplayEvent};
