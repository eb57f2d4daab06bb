mod bot;
mod config;
mod device_link;
mod error;
mod gateway;
mod notifier;
mod operators;
mod state_holder;

#[cfg(test)]
mod test_support;

pub use bot::Bot;
pub use config::Config;
pub use device_link::{DeviceLink, SendError, DEFAULT_KEEPALIVE};
pub use error::Error;
pub use gateway::{Gateway, GatewayError, DEFAULT_ACK_TIMEOUT};
pub use notifier::{Broadcaster, Messenger, Notifier};
pub use operators::{Operators, UserId};
pub use state_holder::{ChangeTimeout, ChangeWaiter, Snapshot, StateHolder};

pub use transport::LedState;

pub type ErasedError = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;
