use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::Mutex;
use tokio::time::{self, Instant};

use transport::LedState;

use crate::{DeviceLink, Operators, SendError, StateHolder, UserId};

pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Debug)]
pub enum GatewayError {
    Unauthorized(UserId),
    DeviceOffline,
    Busy,
    TransportFailure(SendError),
    Timeout(LedState),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized(user) => write!(f, "user {user} is not allowed"),
            Self::DeviceOffline => write!(f, "device is offline"),
            Self::Busy => write!(f, "another state change is in progress"),
            Self::TransportFailure(err) => write!(f, "transport failure: {err}"),
            Self::Timeout(target) => {
                write!(f, "device did not acknowledge state {target} in time")
            }
        }
    }
}

impl std::error::Error for GatewayError {}

/// Operator-facing entry point for LED changes.
///
/// One change is in flight at a time; a request arriving while another one
/// waits for its ack fails with `GatewayError::Busy`.
#[derive(Clone)]
pub struct Gateway {
    link: DeviceLink,
    state: StateHolder,
    operators: Operators,
    ack_timeout: Duration,
    in_flight: Arc<Mutex<()>>,
}

impl Gateway {
    pub fn new(link: DeviceLink, state: StateHolder, operators: Operators) -> Self {
        Self {
            link,
            state,
            operators,
            ack_timeout: DEFAULT_ACK_TIMEOUT,
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_ack_timeout(mut self, ack_timeout: Duration) -> Self {
        self.ack_timeout = ack_timeout;
        self
    }

    pub fn current_state(&self) -> LedState {
        self.state.current()
    }

    pub fn is_device_connected(&self) -> bool {
        self.link.is_connected()
    }

    pub fn authorize(&self, user: UserId) -> Result<(), GatewayError> {
        if self.operators.is_allowed(user) {
            Ok(())
        } else {
            Err(GatewayError::Unauthorized(user))
        }
    }

    pub async fn request_change_as(
        &self,
        user: UserId,
        target: LedState,
    ) -> Result<LedState, GatewayError> {
        self.authorize(user)?;

        info!("user {user} requested {target}");

        self.request_change(target).await
    }

    /// Sends `target` to the device once and waits for the next state change.
    /// The ack timeout bounds the send and the wait together.
    ///
    /// Resolves with the state observed when the wait ends. That is usually
    /// `target`, but a report the device made on its own may win the race.
    pub async fn request_change(&self, target: LedState) -> Result<LedState, GatewayError> {
        if !self.link.is_connected() {
            return Err(GatewayError::DeviceOffline);
        }

        let _in_flight = self.in_flight.try_lock().map_err(|_| GatewayError::Busy)?;
        let deadline = Instant::now() + self.ack_timeout;

        // must subscribe before sending, an ack may arrive before `send` returns
        let waiter = self.state.subscribe();

        debug!("sending {target} to device");

        match time::timeout_at(deadline, self.link.send(target)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!("Error sending {target} to device: {err}");
                return Err(GatewayError::TransportFailure(err));
            }
            Err(_) => {
                error!("Timeout sending {target} to device");
                return Err(GatewayError::Timeout(target));
            }
        }

        let remaining = deadline.saturating_duration_since(Instant::now());

        match waiter.wait(remaining).await {
            Ok(snapshot) => {
                if snapshot.state != target {
                    warn!("requested {target}, device settled on {}", snapshot.state);
                }

                Ok(snapshot.state)
            }
            Err(_) => {
                error!("Timeout waiting for the device to acknowledge {target}");
                Err(GatewayError::Timeout(target))
            }
        }
    }
}
