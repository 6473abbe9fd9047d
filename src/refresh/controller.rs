use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
    time,
};

use crate::{log_info, log_warn};

use super::{DragOutcome, RefreshState, ScrollPosition};

const ENABLE_LOGS: bool = true;

/// How long the view stays in `Refreshing` after a successful pull.
pub const REFRESH_HOLD: Duration = Duration::from_millis(1500);

/// Work to run when a pull-to-refresh completes. It runs alongside the
/// refresh hold and cannot shorten or extend it.
#[async_trait]
pub trait RefreshAction: Send + Sync {
    async fn refresh(&self) -> Result<()>;
}

/// Placeholder action; history is local so there is nothing to fetch.
pub struct NoopRefresh;

#[async_trait]
impl RefreshAction for NoopRefresh {
    async fn refresh(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
pub struct RefreshController {
    state: Arc<Mutex<RefreshState>>,
    scroll: Arc<dyn ScrollPosition>,
    action: Arc<dyn RefreshAction>,
    hold_timer: Arc<Mutex<Option<JoinHandle<()>>>>,
    state_tx: Arc<watch::Sender<RefreshState>>,
}

impl RefreshController {
    pub fn new(scroll: Arc<dyn ScrollPosition>, action: Arc<dyn RefreshAction>) -> Self {
        let (state_tx, _) = watch::channel(RefreshState::Idle);
        Self {
            state: Arc::new(Mutex::new(RefreshState::Idle)),
            scroll,
            action,
            hold_timer: Arc::new(Mutex::new(None)),
            state_tx: Arc::new(state_tx),
        }
    }

    pub async fn get_state(&self) -> RefreshState {
        *self.state.lock().await
    }

    /// Receives every state change, including the automatic return to
    /// `Idle` after the hold.
    pub fn subscribe(&self) -> watch::Receiver<RefreshState> {
        self.state_tx.subscribe()
    }

    pub async fn drag_start(&self, y: f64) -> DragOutcome {
        let mut state = self.state.lock().await;
        let outcome = state.drag_start(y, self.scroll.as_ref());
        self.publish(outcome, *state);
        outcome
    }

    pub async fn drag_move(&self, y: f64) -> DragOutcome {
        let mut state = self.state.lock().await;
        let outcome = state.drag_move(y);
        self.publish(outcome, *state);
        outcome
    }

    pub async fn drag_end(&self) -> DragOutcome {
        let outcome = {
            let mut state = self.state.lock().await;
            let outcome = state.drag_end();
            self.publish(outcome, *state);
            outcome
        };

        if outcome == DragOutcome::RefreshTriggered {
            log_info!("Pull-to-refresh triggered");
            self.spawn_hold_timer().await;
        }

        outcome
    }

    /// Aborts a running refresh and returns to `Idle`.
    pub async fn cancel(&self) {
        if let Some(handle) = self.hold_timer.lock().await.take() {
            handle.abort();
        }
        let mut state = self.state.lock().await;
        if state.finish_refresh() {
            self.state_tx.send_replace(*state);
        }
    }

    fn publish(&self, outcome: DragOutcome, state: RefreshState) {
        if outcome != DragOutcome::Ignored {
            self.state_tx.send_replace(state);
        }
    }

    async fn spawn_hold_timer(&self) {
        let mut timer_guard = self.hold_timer.lock().await;
        if let Some(handle) = timer_guard.take() {
            handle.abort();
        }

        let action = self.action.clone();
        tokio::spawn(async move {
            if let Err(err) = action.refresh().await {
                log_warn!("Refresh action failed: {err:#}");
            }
        });

        let state = self.state.clone();
        let state_tx = self.state_tx.clone();
        let handle = tokio::spawn(async move {
            time::sleep(REFRESH_HOLD).await;
            let mut guard = state.lock().await;
            if guard.finish_refresh() {
                state_tx.send_replace(*guard);
            }
        });

        *timer_guard = Some(handle);
    }
}
