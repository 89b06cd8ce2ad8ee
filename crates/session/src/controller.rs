//! Session controller - login, transfer, loan and close-account orchestration
//!
//! The controller owns the directory and the single active session behind one
//! lock, so every operation observes and mutates a consistent state. The
//! countdown task and any pending loan disbursement take the same lock before
//! touching anything.
//!
//! State machine: LoggedOut -> LoggedIn -> LoggedOut, re-entrant. Every
//! operation resolves to `Ok` (state changed, events emitted) or a
//! `Rejection` (nothing changed, nothing emitted) - the front end renders
//! nothing for rejections, preserving the original silent-failure UX.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use demobank_directory::AccountDirectory;
use demobank_ledger::MovementOrder;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;

use crate::error::Rejection;
use crate::event::{AccountView, EndReason, SessionEvent};
use crate::timer::{start_countdown, CountdownHandle, SESSION_SECONDS};

/// Simulated loan processing latency before disbursement
pub const LOAN_DELAY: Duration = Duration::from_millis(2500);

/// The single authenticated session and its scheduled tasks.
struct ActiveSession {
    username: String,
    countdown: CountdownHandle,
    pending_loans: Vec<JoinHandle<()>>,
}

impl ActiveSession {
    /// Abort every task belonging to this session.
    ///
    /// Loans first, countdown last: the caller may *be* the countdown task
    /// (on expiry), and nothing may run after it aborts itself.
    fn abort_tasks(&self) {
        for loan in &self.pending_loans {
            loan.abort();
        }
        self.countdown.abort();
    }
}

/// State shared between the controller and its spawned tasks
pub(crate) struct SharedState {
    inner: tokio::sync::Mutex<Inner>,
    events: mpsc::UnboundedSender<SessionEvent>,
    timeout_secs: u64,
}

struct Inner {
    directory: AccountDirectory,
    session: Option<ActiveSession>,
    order: MovementOrder,
}

impl SharedState {
    /// Send an event; a dropped receiver just means nobody is rendering.
    pub(crate) fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!("event receiver dropped");
        }
    }

    /// Terminate the active session: emit `SessionEnded` once and abort the
    /// countdown and any pending loan disbursement. No-op when logged out.
    pub(crate) async fn end_session(&self, reason: EndReason) {
        let session = self.inner.lock().await.session.take();
        if let Some(session) = session {
            tracing::info!(username = %session.username, ?reason, "session ended");
            self.emit(SessionEvent::session_ended(reason));
            session.abort_tasks();
        }
    }
}

/// View of the logged-in account in the current display order
fn current_view(inner: &Inner) -> Option<AccountView> {
    let username = inner.session.as_ref()?.username.as_str();
    let account = inner.directory.find_by_username(username)?;
    Some(AccountView::of(account, inner.order, Utc::now()))
}

/// Abort the running countdown and start a fresh one at full duration
fn reset_countdown(inner: &mut Inner, shared: &Arc<SharedState>) {
    if let Some(session) = inner.session.as_mut() {
        session.countdown.abort();
        session.countdown = start_countdown(shared.clone(), shared.timeout_secs);
    }
}

/// Orchestrates all account operations for at most one session at a time.
pub struct SessionController {
    shared: Arc<SharedState>,
}

impl SessionController {
    /// Create a controller over `directory` with the default five-minute
    /// session timeout. Returns the controller and the event stream a front
    /// end should drain.
    pub fn new(directory: AccountDirectory) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        Self::with_timeout(directory, SESSION_SECONDS)
    }

    /// Create a controller with a custom session timeout in seconds
    pub fn with_timeout(
        directory: AccountDirectory,
        timeout_secs: u64,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(SharedState {
            inner: tokio::sync::Mutex::new(Inner {
                directory,
                session: None,
                order: MovementOrder::default(),
            }),
            events: tx,
            timeout_secs,
        });
        (Self { shared }, rx)
    }

    /// Authenticate and open a session.
    ///
    /// On success the countdown (re)starts at full duration and a `Refresh`
    /// is emitted. A previous session, if any, is replaced without a
    /// `SessionEnded` signal, mirroring the original's re-login behavior.
    pub async fn login(&self, username: &str, pin: u32) -> Result<(), Rejection> {
        let mut inner = self.shared.inner.lock().await;

        let (username, view) = {
            let account = inner
                .directory
                .find_by_credential(username, pin)
                .ok_or(Rejection::BadCredentials)?;
            (
                account.username.clone(),
                AccountView::of(account, inner.order, Utc::now()),
            )
        };

        if let Some(old) = inner.session.take() {
            old.abort_tasks();
        }
        inner.session = Some(ActiveSession {
            username: username.clone(),
            countdown: start_countdown(self.shared.clone(), self.shared.timeout_secs),
            pending_loans: Vec::new(),
        });

        tracing::info!(%username, "login");
        self.shared.emit(SessionEvent::refresh(view));
        Ok(())
    }

    /// Move `amount` from the logged-in account to `to`.
    ///
    /// All four conditions must hold: positive amount, existing recipient,
    /// recipient is not the sender, and sufficient balance. On success both
    /// ledgers gain one movement timestamped now, the countdown resets and a
    /// `Refresh` is emitted.
    pub async fn transfer(&self, to: &str, amount: Decimal) -> Result<(), Rejection> {
        let mut inner = self.shared.inner.lock().await;
        let sender = inner
            .session
            .as_ref()
            .ok_or(Rejection::NotLoggedIn)?
            .username
            .clone();

        if amount <= Decimal::ZERO {
            return Err(Rejection::NonPositiveAmount(amount));
        }
        if inner.directory.find_by_username(to).is_none() {
            return Err(Rejection::UnknownRecipient(to.to_string()));
        }
        if to == sender {
            return Err(Rejection::SelfTransfer);
        }
        let available = inner
            .directory
            .find_by_username(&sender)
            .ok_or(Rejection::NotLoggedIn)?
            .ledger
            .balance();
        if available < amount {
            return Err(Rejection::InsufficientBalance {
                available,
                required: amount,
            });
        }

        let now = Utc::now();
        let (from, to_account) = inner
            .directory
            .pair_mut(&sender, to)
            .ok_or_else(|| Rejection::UnknownRecipient(to.to_string()))?;
        from.ledger.record(-amount, now);
        to_account.ledger.record(amount, now);
        tracing::info!(%sender, recipient = %to, %amount, "transfer");

        reset_countdown(&mut inner, &self.shared);
        if let Some(view) = current_view(&inner) {
            self.shared.emit(SessionEvent::refresh(view));
        }
        Ok(())
    }

    /// Request a loan of `amount` (floored to a whole unit).
    ///
    /// Accepted when the amount is positive and some single past movement is
    /// at least a tenth of it. Disbursement happens `LOAN_DELAY` later on a
    /// spawned task: the positive movement is timestamped at disbursement
    /// time, the countdown resets and a `Refresh` is emitted. The task is
    /// keyed to this session and aborted if the session ends first.
    pub async fn request_loan(&self, amount: Decimal) -> Result<(), Rejection> {
        let mut inner = self.shared.inner.lock().await;
        let username = inner
            .session
            .as_ref()
            .ok_or(Rejection::NotLoggedIn)?
            .username
            .clone();

        let amount = amount.floor();
        if amount <= Decimal::ZERO {
            return Err(Rejection::NonPositiveAmount(amount));
        }
        let account = inner
            .directory
            .find_by_username(&username)
            .ok_or(Rejection::NotLoggedIn)?;
        if !account.ledger.any_movement_at_least(amount / Decimal::TEN) {
            return Err(Rejection::LoanNotCovered(amount));
        }

        tracing::info!(%username, %amount, "loan accepted, disbursement scheduled");
        let shared = self.shared.clone();
        let user = username.clone();
        let disbursement = tokio::spawn(async move {
            time::sleep(LOAN_DELAY).await;

            let mut inner = shared.inner.lock().await;
            // The session may have ended or changed hands while we slept.
            let still_current = inner
                .session
                .as_ref()
                .is_some_and(|s| s.username == user);
            if !still_current {
                return;
            }
            if let Some(account) = inner.directory.find_by_username_mut(&user) {
                account.ledger.record(amount, Utc::now());
            }
            tracing::info!(username = %user, %amount, "loan disbursed");

            reset_countdown(&mut inner, &shared);
            if let Some(view) = current_view(&inner) {
                shared.emit(SessionEvent::refresh(view));
            }
        });

        if let Some(session) = inner.session.as_mut() {
            session.pending_loans.retain(|h| !h.is_finished());
            session.pending_loans.push(disbursement);
        }
        Ok(())
    }

    /// Close the logged-in account.
    ///
    /// The credentials must match the current session exactly. On success the
    /// account is removed from the directory, the session ends with reason
    /// `Closed` and all scheduled tasks are aborted.
    pub async fn close_account(&self, username: &str, pin: u32) -> Result<(), Rejection> {
        let session = {
            let mut inner = self.shared.inner.lock().await;
            let current = inner.session.as_ref().ok_or(Rejection::NotLoggedIn)?;
            if current.username != username {
                return Err(Rejection::BadCredentials);
            }
            if inner.directory.find_by_credential(username, pin).is_none() {
                return Err(Rejection::BadCredentials);
            }
            inner.directory.remove(username, pin);
            inner.session.take()
        };

        if let Some(session) = session {
            tracing::info!(%username, "account closed");
            self.shared.emit(SessionEvent::session_ended(EndReason::Closed));
            session.abort_tasks();
        }
        Ok(())
    }

    /// End the session explicitly: no further ticks, pending loans aborted.
    pub async fn logout(&self) -> Result<(), Rejection> {
        let session = self.shared.inner.lock().await.session.take();
        let session = session.ok_or(Rejection::NotLoggedIn)?;
        tracing::info!(username = %session.username, "logout");
        self.shared
            .emit(SessionEvent::session_ended(EndReason::LoggedOut));
        session.abort_tasks();
        Ok(())
    }

    /// Flip the history display order between insertion and ascending by
    /// amount. Pure view concern: no ledger changes, no countdown reset. When
    /// logged in, re-emits a `Refresh` so the front end can redraw.
    pub async fn toggle_sort(&self) {
        let mut inner = self.shared.inner.lock().await;
        inner.order = inner.order.toggled();
        if let Some(view) = current_view(&inner) {
            self.shared.emit(SessionEvent::refresh(view));
        }
    }

    /// Whether a session is currently open
    pub async fn is_logged_in(&self) -> bool {
        self.shared.inner.lock().await.session.is_some()
    }

    /// Username of the logged-in account, if any
    pub async fn current_username(&self) -> Option<String> {
        self.shared
            .inner
            .lock()
            .await
            .session
            .as_ref()
            .map(|s| s.username.clone())
    }

    /// Snapshot of the directory, for inspection and tests
    pub async fn directory(&self) -> AccountDirectory {
        self.shared.inner.lock().await.directory.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demobank_directory::demo_directory;
    use rust_decimal_macros::dec;

    async fn balance_of(controller: &SessionController, username: &str) -> Decimal {
        controller
            .directory()
            .await
            .find_by_username(username)
            .map(|a| a.ledger.balance())
            .unwrap_or_default()
    }

    /// Skip ticks until the next non-tick event, bounded so a broken stream
    /// fails the test instead of hanging it.
    async fn next_non_tick(
        rx: &mut mpsc::UnboundedReceiver<SessionEvent>,
    ) -> SessionEvent {
        for _ in 0..10_000 {
            match rx.recv().await.expect("event stream closed") {
                SessionEvent::Tick { .. } => continue,
                other => return other,
            }
        }
        panic!("only ticks received");
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_success_emits_refresh() {
        let (controller, mut rx) = SessionController::new(demo_directory());

        controller.login("js", 1111).await.unwrap();
        assert!(controller.is_logged_in().await);
        assert_eq!(controller.current_username().await.as_deref(), Some("js"));

        match next_non_tick(&mut rx).await {
            SessionEvent::Refresh(view) => {
                assert_eq!(view.username, "js");
                assert_eq!(view.first_name(), "Jonas");
                assert_eq!(view.summary.balance, dec!(25552.59));
                assert_eq!(view.movements.len(), 8);
            }
            other => panic!("expected refresh, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_bad_credentials_is_silent_noop() {
        let (controller, mut rx) = SessionController::new(demo_directory());

        assert_eq!(
            controller.login("js", 9999).await,
            Err(Rejection::BadCredentials)
        );
        assert!(!controller.is_logged_in().await);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transfer_moves_amount_between_ledgers() {
        let (controller, mut rx) = SessionController::new(demo_directory());
        controller.login("js", 1111).await.unwrap();
        let _ = next_non_tick(&mut rx).await; // login refresh

        controller.transfer("jd", dec!(500)).await.unwrap();

        assert_eq!(balance_of(&controller, "js").await, dec!(25052.59));
        assert_eq!(balance_of(&controller, "jd").await, dec!(12220));

        let dir = controller.directory().await;
        assert_eq!(dir.find_by_username("js").unwrap().ledger.len(), 9);
        assert_eq!(dir.find_by_username("jd").unwrap().ledger.len(), 9);

        match next_non_tick(&mut rx).await {
            SessionEvent::Refresh(view) => {
                assert_eq!(view.summary.balance, dec!(25052.59));
            }
            other => panic!("expected refresh, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_transfer_rejections_leave_ledgers_untouched() {
        let (controller, _rx) = SessionController::new(demo_directory());
        controller.login("js", 1111).await.unwrap();

        assert_eq!(
            controller.transfer("jd", dec!(0)).await,
            Err(Rejection::NonPositiveAmount(dec!(0)))
        );
        assert_eq!(
            controller.transfer("jd", dec!(-10)).await,
            Err(Rejection::NonPositiveAmount(dec!(-10)))
        );
        assert_eq!(
            controller.transfer("ghost", dec!(100)).await,
            Err(Rejection::UnknownRecipient("ghost".to_string()))
        );
        assert_eq!(
            controller.transfer("js", dec!(100)).await,
            Err(Rejection::SelfTransfer)
        );
        assert_eq!(
            controller.transfer("jd", dec!(1000000)).await,
            Err(Rejection::InsufficientBalance {
                available: dec!(25552.59),
                required: dec!(1000000),
            })
        );

        assert_eq!(balance_of(&controller, "js").await, dec!(25552.59));
        assert_eq!(balance_of(&controller, "jd").await, dec!(11720));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transfer_requires_login() {
        let (controller, _rx) = SessionController::new(demo_directory());
        assert_eq!(
            controller.transfer("jd", dec!(100)).await,
            Err(Rejection::NotLoggedIn)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_loan_disbursed_after_delay() {
        let (controller, mut rx) = SessionController::new(demo_directory());
        controller.login("js", 1111).await.unwrap();
        let _ = next_non_tick(&mut rx).await; // login refresh

        // 25000 covers a tenth of 200000.7; the request is floored to 200000.
        controller.request_loan(dec!(200000.7)).await.unwrap();
        assert_eq!(balance_of(&controller, "js").await, dec!(25552.59));

        match next_non_tick(&mut rx).await {
            SessionEvent::Refresh(view) => {
                assert_eq!(view.summary.balance, dec!(225552.59));
            }
            other => panic!("expected refresh, got {other:?}"),
        }
        assert_eq!(balance_of(&controller, "js").await, dec!(225552.59));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unaffordable_loan_never_disburses() {
        let (controller, mut rx) = SessionController::new(demo_directory());
        controller.login("js", 1111).await.unwrap();
        let _ = next_non_tick(&mut rx).await;

        // Largest movement is 25000, so 250001 is not covered.
        assert_eq!(
            controller.request_loan(dec!(250001)).await,
            Err(Rejection::LoanNotCovered(dec!(250001)))
        );

        time::advance(Duration::from_secs(5)).await;
        tokio::task::yield_now().await;

        assert_eq!(balance_of(&controller, "js").await, dec!(25552.59));
        while let Ok(event) = rx.try_recv() {
            assert!(matches!(event, SessionEvent::Tick { .. }));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_loan_aborted_on_logout() {
        let (controller, mut rx) = SessionController::new(demo_directory());
        controller.login("js", 1111).await.unwrap();
        let _ = next_non_tick(&mut rx).await;

        controller.request_loan(dec!(1000)).await.unwrap();
        controller.logout().await.unwrap();

        time::advance(Duration::from_secs(5)).await;
        tokio::task::yield_now().await;

        // The disbursement never lands.
        assert_eq!(balance_of(&controller, "js").await, dec!(25552.59));

        let mut ended = 0;
        while let Ok(event) = rx.try_recv() {
            match event {
                SessionEvent::SessionEnded { reason } => {
                    ended += 1;
                    assert_eq!(reason, EndReason::LoggedOut);
                }
                SessionEvent::Tick { .. } => {}
                SessionEvent::Refresh(_) => panic!("loan disbursed into a dead session"),
            }
        }
        assert_eq!(ended, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_account_removes_and_hides() {
        let (controller, mut rx) = SessionController::new(demo_directory());
        controller.login("jd", 2222).await.unwrap();
        let _ = next_non_tick(&mut rx).await;

        // Wrong pin, wrong user: silent no-ops.
        assert_eq!(
            controller.close_account("jd", 1111).await,
            Err(Rejection::BadCredentials)
        );
        assert_eq!(
            controller.close_account("js", 1111).await,
            Err(Rejection::BadCredentials)
        );

        controller.close_account("jd", 2222).await.unwrap();
        assert!(!controller.is_logged_in().await);

        let dir = controller.directory().await;
        assert!(dir.find_by_credential("jd", 2222).is_none());
        assert_eq!(dir.len(), 1);

        match next_non_tick(&mut rx).await {
            SessionEvent::SessionEnded { reason } => assert_eq!(reason, EndReason::Closed),
            other => panic!("expected session end, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_sort_reorders_view_only() {
        let (controller, mut rx) = SessionController::new(demo_directory());
        controller.login("js", 1111).await.unwrap();
        let _ = next_non_tick(&mut rx).await;

        controller.toggle_sort().await;
        match next_non_tick(&mut rx).await {
            SessionEvent::Refresh(view) => {
                let amounts: Vec<_> = view.movements.iter().map(|m| m.amount).collect();
                let mut sorted = amounts.clone();
                sorted.sort();
                assert_eq!(amounts, sorted);
            }
            other => panic!("expected refresh, got {other:?}"),
        }

        // Second toggle restores insertion order; storage never changed.
        controller.toggle_sort().await;
        match next_non_tick(&mut rx).await {
            SessionEvent::Refresh(view) => {
                assert_eq!(view.movements[0].amount, dec!(200));
                assert_eq!(view.movements[7].amount, dec!(1300));
            }
            other => panic!("expected refresh, got {other:?}"),
        }
    }
}
