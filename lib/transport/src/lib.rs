//! Wire protocol spoken between the gateway and the LED device.
//!
//! Every message is a single JSON object carrying a `type` discriminator and
//! a `state`:
//!
//! ```text
//! {"type": "tg_change_state", "state": "blue"}     gateway -> device, device -> gateway (ack)
//! {"type": "esp32_change_state", "state": "off"}   device -> gateway (unsolicited)
//! ```

mod command;
mod event;

pub use command::OutboundCommand;
pub use event::InboundEvent;

use serde::{Deserialize, Serialize};
use str_derive::Str;

#[derive(Copy, Clone, Debug, Default, Deserialize, Serialize, Str, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LedState {
    Red,
    Blue,
    #[default]
    Off,
    Error,
}

impl LedState {
    pub const fn all_states() -> [LedState; 4] {
        [LedState::Red, LedState::Blue, LedState::Off, LedState::Error]
    }
}

/// Decodes one inbound frame. Any shape other than the two known events is
/// an error; the caller decides what a bad frame means for the connection.
pub fn decode(payload: &[u8]) -> serde_json::Result<InboundEvent> {
    serde_json::from_slice(payload)
}

pub fn encode(command: &OutboundCommand) -> serde_json::Result<String> {
    serde_json::to_string(command)
}
