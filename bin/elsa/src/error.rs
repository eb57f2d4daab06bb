use std::fmt;

use tokio_tungstenite::tungstenite;

#[derive(Debug)]
pub enum Error {
    AlreadyConnected,
    DeviceUnresponsive,
    ProtocolViolation(serde_json::Error),
    WebSocket(tungstenite::Error),
    Telegram(telegram::Error),
    Io(std::io::Error),
    Config {
        variable: &'static str,
        reason: String,
    },
}

impl From<tungstenite::Error> for Error {
    fn from(err: tungstenite::Error) -> Self {
        Self::WebSocket(err)
    }
}

impl From<telegram::Error> for Error {
    fn from(err: telegram::Error) -> Self {
        Self::Telegram(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyConnected => write!(f, "another device is already connected"),
            Self::DeviceUnresponsive => write!(f, "device stopped responding"),
            Self::ProtocolViolation(err) => write!(f, "protocol violation: {err}"),
            Self::WebSocket(err) => write!(f, "websocket error: {err}"),
            Self::Telegram(err) => write!(f, "telegram error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Config { variable, reason } => write!(f, "invalid {variable}: {reason}"),
        }
    }
}

impl std::error::Error for Error {}
