use async_trait::async_trait;
use log::{debug, error};

use transport::LedState;

use crate::{Operators, Result, UserId};

/// Tells every operator that the device changed state on its own.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn broadcast(&self, state: LedState);
}

/// Delivers a state notification to a single recipient.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn notify(&self, recipient: UserId, state: LedState) -> Result<()>;
}

pub struct Broadcaster<M> {
    messenger: M,
    operators: Operators,
}

impl<M: Messenger> Broadcaster<M> {
    pub fn new(messenger: M, operators: Operators) -> Self {
        Self {
            messenger,
            operators,
        }
    }
}

#[async_trait]
impl<M: Messenger> Notifier for Broadcaster<M> {
    async fn broadcast(&self, state: LedState) {
        for recipient in self.operators.recipients() {
            match self.messenger.notify(recipient, state).await {
                Ok(()) => debug!("notified {recipient} about {state}"),
                Err(err) => error!("Error notifying {recipient} about {state}: {err}"),
            }
        }
    }
}
