use telegram::{InlineKeyboardButton, InlineKeyboardMarkup};
use transport::LedState;

use crate::GatewayError;

pub const NOT_ALLOWED: &str = "You are not allowed to use this bot.";
pub const DEVICE_OFFLINE: &str = "The ESP32 is not connected. Please try again later.";
pub const BUSY: &str = "Another LED state change is in progress. Please try again.";
pub const UNSUPPORTED: &str = "Unsupported LED state.";

const CHOOSE_COLOR: &str = "Choose a color to change the LED state.";

pub fn title(state: LedState) -> &'static str {
    match state {
        LedState::Red => "Red",
        LedState::Blue => "Blue",
        LedState::Off => "Off",
        LedState::Error => "Error",
    }
}

pub fn prompt(state: LedState) -> String {
    match state {
        LedState::Error => CHOOSE_COLOR.to_string(),
        state => format!("LED State: {}\n\n{CHOOSE_COLOR}", title(state)),
    }
}

pub fn state_changed(state: LedState) -> String {
    format!("LED state changed to {}.", title(state))
}

pub fn change_result(target: LedState, result: &Result<LedState, GatewayError>) -> String {
    match result {
        Ok(state) => state_changed(*state),
        Err(GatewayError::Timeout(_)) => {
            format!("Timeout occurred while changing the LED state to {target}.")
        }
        Err(GatewayError::DeviceOffline) => DEVICE_OFFLINE.to_string(),
        Err(GatewayError::Unauthorized(_)) => NOT_ALLOWED.to_string(),
        Err(GatewayError::Busy) => BUSY.to_string(),
        Err(GatewayError::TransportFailure(_)) => {
            format!("An unexpected error occurred while changing the LED state to {target}.")
        }
    }
}

pub fn keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::from(vec![
        vec![
            InlineKeyboardButton::new("LED: Blue 🔵", LedState::Blue.to_string()),
            InlineKeyboardButton::new("LED: Red 🔴", LedState::Red.to_string()),
        ],
        vec![InlineKeyboardButton::new(
            "Turn Off LED 📴",
            LedState::Off.to_string(),
        )],
    ])
}
