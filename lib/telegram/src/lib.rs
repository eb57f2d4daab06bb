//! Minimal Telegram Bot API client: long polling, plain text messages and
//! inline keyboards.

mod client;
pub use client::Client;

mod error;
pub use error::Error;

mod keyboard;
pub use keyboard::{InlineKeyboardButton, InlineKeyboardMarkup};

mod methods;
pub use methods::{AnswerCallbackQuery, DeleteMessage, EditMessageText, GetUpdates, SendMessage};

mod types;
pub use types::{CallbackQuery, Chat, Message, Response, Update, User};

pub type Result<T> = std::result::Result<T, Error>;

pub type UserId = i64;
pub type ChatId = i64;
pub type MessageId = i64;
