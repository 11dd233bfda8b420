use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::models::{ArcEventTx, Event};
use crate::stream::StreamSink;

use super::emit;
use super::state::{StoreState, lock_state};

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Terminal {
    pub result: Result<(), String>,
    /// Whether the session was still current when the stream finished.
    pub current: bool,
}

/// Sink bound to one session number. Callbacks from a session that is no
/// longer current leave the store untouched.
pub(super) struct SessionSink {
    session: u64,
    state: Arc<Mutex<StoreState>>,
    event_tx: Option<ArcEventTx>,
    terminal: Mutex<Option<Terminal>>,
}

impl SessionSink {
    pub fn new(session: u64, state: Arc<Mutex<StoreState>>, event_tx: Option<ArcEventTx>) -> Self {
        Self {
            session,
            state,
            event_tx,
            terminal: Mutex::new(None),
        }
    }

    pub fn take_terminal(&self) -> Option<Terminal> {
        self.terminal
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }

    async fn finish(&self, result: Result<(), String>) {
        let current = {
            let mut terminal = self
                .terminal
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if terminal.is_some() {
                log::warn!(
                    "Session {} reported more than one result, ignoring",
                    self.session
                );
                return;
            }
            let current = lock_state(&self.state).close_session(self.session);
            *terminal = Some(Terminal {
                result: result.clone(),
                current,
            });
            current
        };

        if !current {
            log::debug!("Ignoring result of abandoned session {}", self.session);
            return;
        }

        match result {
            Ok(()) => {
                log::debug!("Session {} completed", self.session);
                emit(&self.event_tx, Event::StreamCompleted(self.session)).await;
            }
            Err(message) => {
                log::error!("Session {} failed: {}", self.session, message);
                emit(&self.event_tx, Event::StreamFailed(self.session, message)).await;
            }
        }
    }
}

#[async_trait]
impl StreamSink for SessionSink {
    async fn on_fragment(&self, fragment: String) {
        let accepted = {
            let mut state = lock_state(&self.state);
            match state.session.as_mut() {
                Some(session) if session.id() == self.session => {
                    session.append(&fragment);
                    true
                }
                _ => false,
            }
        };

        if !accepted {
            log::trace!("Dropping fragment of abandoned session {}", self.session);
            return;
        }
        emit(&self.event_tx, Event::StreamFragment(fragment)).await;
    }

    async fn on_complete(&self) {
        self.finish(Ok(())).await;
    }

    async fn on_error(&self, message: String) {
        self.finish(Err(message)).await;
    }
}
