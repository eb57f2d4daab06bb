use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::trace;
use tokio::sync::watch;
use tokio::time;

use transport::LedState;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub state: LedState,
    /// Number of `change_state` calls so far.
    pub version: u64,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ChangeTimeout;

impl fmt::Display for ChangeTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timed out waiting for a state change")
    }
}

impl std::error::Error for ChangeTimeout {}

/// Last known LED state, shared by handle.
///
/// Every `change_state` bumps the version and releases all waiters that
/// subscribed before it. A waiter subscribed after a change only sees the
/// next one.
#[derive(Clone)]
pub struct StateHolder {
    sender: Arc<watch::Sender<Snapshot>>,
}

impl StateHolder {
    pub fn new() -> Self {
        Self::with_state(LedState::default())
    }

    pub fn with_state(state: LedState) -> Self {
        let (sender, _) = watch::channel(Snapshot { state, version: 0 });

        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn current(&self) -> LedState {
        self.sender.borrow().state
    }

    pub fn snapshot(&self) -> Snapshot {
        *self.sender.borrow()
    }

    /// Replaces the state and wakes every subscribed waiter, even when the
    /// new state equals the old one.
    pub fn change_state(&self, state: LedState) {
        self.sender.send_modify(|snapshot| {
            snapshot.state = state;
            snapshot.version += 1;
        });

        trace!("state changed to {state}");
    }

    /// Captures the current version. The returned waiter resolves on the
    /// first `change_state` after this call.
    pub fn subscribe(&self) -> ChangeWaiter {
        ChangeWaiter {
            receiver: self.sender.subscribe(),
            _sender: self.sender.clone(),
        }
    }

    pub async fn await_change(&self, timeout: Duration) -> Result<Snapshot, ChangeTimeout> {
        self.subscribe().wait(timeout).await
    }
}

impl Default for StateHolder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ChangeWaiter {
    receiver: watch::Receiver<Snapshot>,
    // keeps the channel open for as long as someone waits on it
    _sender: Arc<watch::Sender<Snapshot>>,
}

impl ChangeWaiter {
    pub async fn wait(mut self, timeout: Duration) -> Result<Snapshot, ChangeTimeout> {
        match time::timeout(timeout, self.receiver.changed()).await {
            Ok(Ok(())) => Ok(*self.receiver.borrow_and_update()),
            Ok(Err(_)) | Err(_) => Err(ChangeTimeout),
        }
    }
}
