//! Display session manager
//!
//! Tracks what the panel shows and arbitrates between agent requests and
//! pending human confirmations. The session never owns the adapter; every
//! operation receives the registry's display, or `None` when no display is
//! installed.
//!
//! Checks run in a fixed order: `NoDisplay`, then `InvalidContent`, then
//! `Busy`. An adapter failure leaves the session untouched.

use heapless::Deque;
use nekopaw_protocol::{ConfirmStatus, RefreshMode, SessionState};

use super::content::Snapshot;
use super::state::{next_state, DisplayEvent};
use crate::error::BridgeError;
use crate::tick::{deadline_reached, elapsed_ms, MAX_SPAN_MS};
use crate::traits::{ConfirmContent, DisplayAdapter, DisplayCapabilities, TextContent};

/// Resolved confirmations remembered for status queries
pub const CONFIRM_HISTORY_LEN: usize = 8;

/// Identifies one confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfirmTicket(pub u32);

/// Final status of a confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfirmOutcome {
    pub ticket: ConfirmTicket,
    pub status: ConfirmStatus,
}

impl ConfirmOutcome {
    /// Returns true if the user accepted
    pub fn accepted(&self) -> bool {
        self.status == ConfirmStatus::Accepted
    }
}

/// Something the session expired during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayExpiry {
    /// Text or bitmap TTL elapsed
    Content,
    /// Confirmation timed out
    Confirm(ConfirmTicket),
}

#[derive(Debug, Clone, Copy)]
struct PendingConfirm {
    ticket: ConfirmTicket,
    deadline_ms: Option<u32>,
}

/// Refresh mode actually used for a request
///
/// Partial is only used when requested and supported by the panel.
pub fn effective_refresh(caps: &DisplayCapabilities, full_refresh: bool) -> RefreshMode {
    RefreshMode::from_full(full_refresh || !caps.supports_partial)
}

/// Deadline `seconds` from now, capped at [`MAX_SPAN_MS`]; 0 means none
fn deadline(now_ms: u32, seconds: Option<u32>) -> Option<u32> {
    match seconds {
        Some(s) if s > 0 => {
            let span = (u64::from(s) * 1000).min(u64::from(MAX_SPAN_MS)) as u32;
            Some(now_ms.wrapping_add(span))
        }
        _ => None,
    }
}

/// Display session state machine
#[derive(Debug, Clone)]
pub struct DisplaySession {
    state: SessionState,
    content: Option<Snapshot>,
    refresh: Option<RefreshMode>,
    /// TTL deadline of text/bitmap content
    expires_at_ms: Option<u32>,
    pending: Option<PendingConfirm>,
    history: Deque<ConfirmOutcome, CONFIRM_HISTORY_LEN>,
    next_ticket: u32,
}

impl Default for DisplaySession {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySession {
    pub const fn new() -> Self {
        Self {
            state: SessionState::Idle,
            content: None,
            refresh: None,
            expires_at_ms: None,
            pending: None,
            history: Deque::new(),
            next_ticket: 1,
        }
    }

    /// Show text
    ///
    /// `ttl_s` clears the content after that many seconds. Returns the
    /// refresh mode used.
    pub fn show_text<D: DisplayAdapter + ?Sized>(
        &mut self,
        display: Option<&mut D>,
        content: &TextContent<'_>,
        full_refresh: bool,
        ttl_s: Option<u32>,
        now_ms: u32,
    ) -> Result<RefreshMode, BridgeError> {
        let display = display.ok_or(BridgeError::NoDisplay)?;
        if content.body.is_none() {
            return Err(BridgeError::InvalidContent);
        }
        let next = next_state(self.state, DisplayEvent::ShowText).ok_or(BridgeError::Busy)?;

        let refresh = effective_refresh(&display.capabilities(), full_refresh);
        display.show_text(content, refresh.is_full())?;

        self.enter(next, Snapshot::text(content), refresh);
        self.expires_at_ms = deadline(now_ms, ttl_s);
        debug!("display: text ({})", refresh.is_full());
        Ok(refresh)
    }

    /// Show a bitmap in the panel's native format
    pub fn show_bitmap<D: DisplayAdapter + ?Sized>(
        &mut self,
        display: Option<&mut D>,
        data: &[u8],
        full_refresh: bool,
        ttl_s: Option<u32>,
        now_ms: u32,
    ) -> Result<RefreshMode, BridgeError> {
        let display = display.ok_or(BridgeError::NoDisplay)?;
        if data.is_empty() {
            return Err(BridgeError::InvalidContent);
        }
        let next = next_state(self.state, DisplayEvent::ShowBitmap).ok_or(BridgeError::Busy)?;

        let refresh = effective_refresh(&display.capabilities(), full_refresh);
        display.show_bitmap(data, refresh.is_full())?;

        self.enter(next, Snapshot::bitmap(data), refresh);
        self.expires_at_ms = deadline(now_ms, ttl_s);
        debug!("display: bitmap {} bytes", data.len());
        Ok(refresh)
    }

    /// Show a confirmation prompt
    ///
    /// `timeout_s` resolves the prompt as `Expired` after that many seconds.
    pub fn show_confirm<D: DisplayAdapter + ?Sized>(
        &mut self,
        display: Option<&mut D>,
        content: &ConfirmContent<'_>,
        full_refresh: bool,
        timeout_s: Option<u32>,
        now_ms: u32,
    ) -> Result<ConfirmTicket, BridgeError> {
        let display = display.ok_or(BridgeError::NoDisplay)?;
        let next = next_state(self.state, DisplayEvent::ShowConfirm).ok_or(BridgeError::Busy)?;

        let refresh = effective_refresh(&display.capabilities(), full_refresh);
        display.show_confirm(content, refresh.is_full())?;

        let ticket = self.allocate_ticket();
        self.enter(next, Snapshot::confirm(content), refresh);
        self.expires_at_ms = None;
        self.pending = Some(PendingConfirm {
            ticket,
            deadline_ms: deadline(now_ms, timeout_s),
        });
        info!("display: confirm #{} pending", ticket.0);
        Ok(ticket)
    }

    /// Resolve the pending confirmation
    ///
    /// Clears the panel and returns to `Idle`. Fails with `NotFound` when no
    /// confirmation is pending.
    pub fn resolve_confirm<D: DisplayAdapter + ?Sized>(
        &mut self,
        display: Option<&mut D>,
        accepted: bool,
    ) -> Result<ConfirmOutcome, BridgeError> {
        let pending = self.pending.ok_or(BridgeError::NotFound)?;
        let next = next_state(self.state, DisplayEvent::Resolve).ok_or(BridgeError::NotFound)?;

        if let Some(display) = display {
            display.clear();
        }
        let status = if accepted {
            ConfirmStatus::Accepted
        } else {
            ConfirmStatus::Declined
        };
        let outcome = self.finish(pending.ticket, status);
        self.state = next;
        info!("display: confirm #{} resolved, accepted={}", pending.ticket.0, accepted);
        Ok(outcome)
    }

    /// Blank the panel and return to `Idle`
    ///
    /// Always reaches the adapter. A pending confirmation is recorded as
    /// `Dismissed`.
    pub fn clear<D: DisplayAdapter + ?Sized>(
        &mut self,
        display: Option<&mut D>,
    ) -> Result<(), BridgeError> {
        let display = display.ok_or(BridgeError::NoDisplay)?;
        display.clear();
        self.dismiss_pending();
        self.reset_content();
        self.state = next_state(self.state, DisplayEvent::Clear).unwrap_or(SessionState::Idle);
        debug!("display: cleared");
        Ok(())
    }

    /// Forget all content after the display was replaced
    pub fn reset(&mut self) {
        self.dismiss_pending();
        self.reset_content();
        self.state = SessionState::Idle;
    }

    /// Status of a confirmation ticket
    pub fn confirm_status(&self, ticket: ConfirmTicket) -> Result<ConfirmStatus, BridgeError> {
        if let Some(pending) = self.pending {
            if pending.ticket == ticket {
                return Ok(ConfirmStatus::Pending);
            }
        }
        self.history
            .iter()
            .find(|o| o.ticket == ticket)
            .map(|o| o.status)
            .ok_or(BridgeError::NotFound)
    }

    /// Expire a timed-out confirmation or content whose TTL elapsed
    pub fn tick<D: DisplayAdapter + ?Sized>(
        &mut self,
        display: Option<&mut D>,
        now_ms: u32,
    ) -> Option<DisplayExpiry> {
        let expiry = match (self.pending, self.expires_at_ms) {
            (Some(PendingConfirm {
                ticket,
                deadline_ms: Some(at),
            }), _)
                if deadline_reached(now_ms, at) =>
            {
                self.finish(ticket, ConfirmStatus::Expired);
                DisplayExpiry::Confirm(ticket)
            }
            (None, Some(at)) if deadline_reached(now_ms, at) => DisplayExpiry::Content,
            _ => return None,
        };

        if let Some(display) = display {
            display.clear();
        }
        self.reset_content();
        self.state = next_state(self.state, DisplayEvent::Expire).unwrap_or(SessionState::Idle);
        info!("display: expired");
        Some(expiry)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Snapshot of the content on the panel
    pub fn content(&self) -> Option<&Snapshot> {
        self.content.as_ref()
    }

    /// Refresh mode last applied
    pub fn refresh(&self) -> Option<RefreshMode> {
        self.refresh
    }

    /// Ticket of the pending confirmation
    pub fn pending_ticket(&self) -> Option<ConfirmTicket> {
        self.pending.map(|p| p.ticket)
    }

    /// Most recent resolution
    pub fn last_outcome(&self) -> Option<ConfirmOutcome> {
        self.history.back().copied()
    }

    /// Time left before the content or confirmation expires
    pub fn expires_in_ms(&self, now_ms: u32) -> Option<u32> {
        let at = match self.pending {
            Some(pending) => pending.deadline_ms,
            None => self.expires_at_ms,
        }?;
        Some(elapsed_ms(at, now_ms))
    }

    fn enter(&mut self, state: SessionState, content: Snapshot, refresh: RefreshMode) {
        self.state = state;
        self.content = Some(content);
        self.refresh = Some(refresh);
    }

    fn reset_content(&mut self) {
        self.content = None;
        self.expires_at_ms = None;
    }

    fn allocate_ticket(&mut self) -> ConfirmTicket {
        let ticket = ConfirmTicket(self.next_ticket);
        // Ticket 0 is never issued
        self.next_ticket = self.next_ticket.checked_add(1).unwrap_or(1);
        ticket
    }

    fn dismiss_pending(&mut self) {
        if let Some(pending) = self.pending {
            self.finish(pending.ticket, ConfirmStatus::Dismissed);
        }
    }

    fn finish(&mut self, ticket: ConfirmTicket, status: ConfirmStatus) -> ConfirmOutcome {
        let outcome = ConfirmOutcome { ticket, status };
        self.pending = None;
        if self.history.is_full() {
            self.history.pop_front();
        }
        let _ = self.history.push_back(outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::mock::{Drawn, MockDisplay};
    use crate::traits::AdapterError;

    fn text() -> TextContent<'static> {
        TextContent::body("hello")
    }

    #[test]
    fn test_no_display() {
        let mut session = DisplaySession::new();
        let none: Option<&mut MockDisplay> = None;
        assert_eq!(
            session.show_text(none, &text(), false, None, 0),
            Err(BridgeError::NoDisplay)
        );
        let none: Option<&mut MockDisplay> = None;
        assert_eq!(session.clear(none), Err(BridgeError::NoDisplay));
    }

    #[test]
    fn test_missing_body_and_empty_bitmap() {
        let mut panel = MockDisplay::new(80, 128, true);
        let mut session = DisplaySession::new();

        let no_body = TextContent::default().with_title("only a title");
        assert_eq!(
            session.show_text(Some(&mut panel), &no_body, false, None, 0),
            Err(BridgeError::InvalidContent)
        );
        assert_eq!(
            session.show_bitmap(Some(&mut panel), &[], false, None, 0),
            Err(BridgeError::InvalidContent)
        );
        assert!(panel.calls.is_empty());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_partial_upgraded_without_support() {
        let mut panel = MockDisplay::new(80, 128, false);
        let mut session = DisplaySession::new();

        let refresh = session
            .show_text(Some(&mut panel), &text(), false, None, 0)
            .unwrap();
        assert_eq!(refresh, RefreshMode::Full);
        assert_eq!(panel.last(), Some(Drawn::Text { full: true }));
        assert_eq!(session.refresh(), Some(RefreshMode::Full));
    }

    #[test]
    fn test_partial_honored_with_support() {
        let mut panel = MockDisplay::new(296, 128, true);
        let mut session = DisplaySession::new();

        session
            .show_bitmap(Some(&mut panel), &[0xFF; 16], false, None, 0)
            .unwrap();
        assert_eq!(
            panel.last(),
            Some(Drawn::Bitmap {
                full: false,
                len: 16
            })
        );
        session
            .show_text(Some(&mut panel), &text(), true, None, 0)
            .unwrap();
        assert_eq!(panel.last(), Some(Drawn::Text { full: true }));
        assert_eq!(session.state(), SessionState::ShowingText);
    }

    #[test]
    fn test_confirm_blocks_until_resolved() {
        let mut panel = MockDisplay::new(80, 128, false);
        let mut session = DisplaySession::new();

        let ticket = session
            .show_confirm(Some(&mut panel), &ConfirmContent::titled("Lock?"), false, None, 0)
            .unwrap();
        assert_eq!(session.state(), SessionState::ConfirmPending);

        assert_eq!(
            session.show_text(Some(&mut panel), &text(), false, None, 0),
            Err(BridgeError::Busy)
        );
        assert_eq!(
            session.show_bitmap(Some(&mut panel), &[1], false, None, 0),
            Err(BridgeError::Busy)
        );
        assert_eq!(
            session.show_confirm(Some(&mut panel), &ConfirmContent::default(), false, None, 0),
            Err(BridgeError::Busy)
        );
        assert_eq!(session.confirm_status(ticket), Ok(ConfirmStatus::Pending));

        let outcome = session.resolve_confirm(Some(&mut panel), false).unwrap();
        assert_eq!(outcome.ticket, ticket);
        assert!(!outcome.accepted());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(panel.last(), Some(Drawn::Cleared));
        assert_eq!(session.confirm_status(ticket), Ok(ConfirmStatus::Declined));

        session
            .show_text(Some(&mut panel), &text(), false, None, 0)
            .unwrap();
        assert_eq!(session.state(), SessionState::ShowingText);
    }

    #[test]
    fn test_resolve_without_pending() {
        let mut panel = MockDisplay::new(80, 128, false);
        let mut session = DisplaySession::new();
        assert_eq!(
            session.resolve_confirm(Some(&mut panel), true),
            Err(BridgeError::NotFound)
        );
    }

    #[test]
    fn test_adapter_failure_keeps_state() {
        let mut panel = MockDisplay::new(80, 128, false);
        let mut session = DisplaySession::new();
        session
            .show_text(Some(&mut panel), &text(), false, None, 0)
            .unwrap();

        panel.fail = true;
        assert_eq!(
            session.show_bitmap(Some(&mut panel), &[1, 2, 3], false, None, 0),
            Err(BridgeError::Rejected(AdapterError::Hardware))
        );
        assert_eq!(session.state(), SessionState::ShowingText);
        assert!(matches!(session.content(), Some(Snapshot::Text { .. })));

        assert!(session
            .show_confirm(Some(&mut panel), &ConfirmContent::default(), true, None, 0)
            .is_err());
        assert!(session.pending_ticket().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut panel = MockDisplay::new(80, 128, false);
        let mut session = DisplaySession::new();
        session
            .show_text(Some(&mut panel), &text(), false, None, 0)
            .unwrap();

        assert_eq!(session.clear(Some(&mut panel)), Ok(()));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.clear(Some(&mut panel)), Ok(()));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(&panel.calls[1..], &[Drawn::Cleared, Drawn::Cleared]);
        assert!(session.content().is_none());
    }

    #[test]
    fn test_clear_dismisses_pending() {
        let mut panel = MockDisplay::new(80, 128, false);
        let mut session = DisplaySession::new();
        let ticket = session
            .show_confirm(Some(&mut panel), &ConfirmContent::default(), false, None, 0)
            .unwrap();

        session.clear(Some(&mut panel)).unwrap();
        assert_eq!(session.confirm_status(ticket), Ok(ConfirmStatus::Dismissed));
        assert_eq!(
            session.confirm_status(ConfirmTicket(ticket.0 + 1)),
            Err(BridgeError::NotFound)
        );
    }

    #[test]
    fn test_text_ttl_expires() {
        let mut panel = MockDisplay::new(80, 128, false);
        let mut session = DisplaySession::new();
        session
            .show_text(Some(&mut panel), &text(), false, Some(5), 1_000)
            .unwrap();
        assert_eq!(session.expires_in_ms(2_000), Some(4_000));

        assert_eq!(session.tick(Some(&mut panel), 5_999), None);
        assert_eq!(session.state(), SessionState::ShowingText);

        assert_eq!(
            session.tick(Some(&mut panel), 6_000),
            Some(DisplayExpiry::Content)
        );
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(panel.last(), Some(Drawn::Cleared));
        assert_eq!(session.tick(Some(&mut panel), 9_000), None);
    }

    #[test]
    fn test_zero_ttl_never_expires() {
        let mut panel = MockDisplay::new(80, 128, false);
        let mut session = DisplaySession::new();
        session
            .show_bitmap(Some(&mut panel), &[1], false, Some(0), 0)
            .unwrap();
        assert_eq!(session.expires_in_ms(0), None);
        assert_eq!(session.tick(Some(&mut panel), u32::MAX / 4), None);
    }

    #[test]
    fn test_confirm_timeout() {
        let mut panel = MockDisplay::new(80, 128, false);
        let mut session = DisplaySession::new();
        let ticket = session
            .show_confirm(Some(&mut panel), &ConfirmContent::default(), false, Some(30), 0)
            .unwrap();

        assert_eq!(session.tick(Some(&mut panel), 29_999), None);
        assert_eq!(
            session.tick(Some(&mut panel), 30_000),
            Some(DisplayExpiry::Confirm(ticket))
        );
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.confirm_status(ticket), Ok(ConfirmStatus::Expired));
        assert_eq!(
            session.resolve_confirm(Some(&mut panel), true),
            Err(BridgeError::NotFound)
        );
    }

    #[test]
    fn test_long_ttl_and_timeout_are_capped() {
        let mut panel = MockDisplay::new(80, 128, false);
        let mut session = DisplaySession::new();

        // 30 days overflows the wrap-safe window
        session
            .show_text(Some(&mut panel), &text(), false, Some(30 * 86_400), 0)
            .unwrap();
        assert_eq!(session.tick(Some(&mut panel), 10), None);
        assert_eq!(session.state(), SessionState::ShowingText);
        assert_eq!(session.expires_in_ms(0), Some(MAX_SPAN_MS));

        let ticket = session
            .show_confirm(
                Some(&mut panel),
                &ConfirmContent::default(),
                false,
                Some(u32::MAX),
                1_000,
            )
            .unwrap();
        assert_eq!(session.tick(Some(&mut panel), 1_001), None);
        assert_eq!(session.state(), SessionState::ConfirmPending);
        assert_eq!(session.confirm_status(ticket), Ok(ConfirmStatus::Pending));
        assert_eq!(session.expires_in_ms(1_000), Some(MAX_SPAN_MS));

        // Still expires once the capped span has elapsed
        assert_eq!(
            session.tick(Some(&mut panel), 1_000u32.wrapping_add(MAX_SPAN_MS)),
            Some(DisplayExpiry::Confirm(ticket))
        );
    }

    #[test]
    fn test_confirm_replaces_ttl_content() {
        let mut panel = MockDisplay::new(80, 128, false);
        let mut session = DisplaySession::new();
        session
            .show_text(Some(&mut panel), &text(), false, Some(1), 0)
            .unwrap();
        session
            .show_confirm(Some(&mut panel), &ConfirmContent::default(), false, None, 0)
            .unwrap();

        // The text TTL must not dismiss the prompt
        assert_eq!(session.tick(Some(&mut panel), 10_000), None);
        assert_eq!(session.state(), SessionState::ConfirmPending);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut panel = MockDisplay::new(80, 128, false);
        let mut session = DisplaySession::new();
        let mut tickets = std::vec::Vec::new();
        for _ in 0..CONFIRM_HISTORY_LEN + 2 {
            let t = session
                .show_confirm(Some(&mut panel), &ConfirmContent::default(), false, None, 0)
                .unwrap();
            session.resolve_confirm(Some(&mut panel), true).unwrap();
            panel.calls.clear();
            tickets.push(t);
        }
        assert_eq!(session.confirm_status(tickets[0]), Err(BridgeError::NotFound));
        assert_eq!(
            session.confirm_status(*tickets.last().unwrap()),
            Ok(ConfirmStatus::Accepted)
        );
        assert!(tickets.windows(2).all(|w| w[0] < w[1]));
    }
}
