use serde::Serialize;

use crate::{ChatId, InlineKeyboardMarkup, MessageId};

#[derive(Debug, Serialize)]
pub struct GetUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: ChatId,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub struct EditMessageText<'a> {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AnswerCallbackQuery<'a> {
    pub callback_query_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DeleteMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InlineKeyboardButton;
    use serde_json::json;

    #[test]
    fn test_get_updates() {
        let request = GetUpdates {
            offset: None,
            timeout: 10,
            allowed_updates: &["message"],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "timeout": 10, "allowed_updates": ["message"] })
        );

        let request = GetUpdates {
            offset: Some(813),
            timeout: 0,
            allowed_updates: &[],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "offset": 813, "timeout": 0, "allowed_updates": [] })
        );
    }

    #[test]
    fn test_send_message() {
        let request = SendMessage {
            chat_id: 1001,
            text: "hello",
            reply_markup: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "chat_id": 1001, "text": "hello" })
        );

        let keyboard = InlineKeyboardMarkup::from(vec![vec![InlineKeyboardButton::new("A", "a")]]);
        let request = SendMessage {
            chat_id: 1001,
            text: "pick",
            reply_markup: Some(&keyboard),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "chat_id": 1001,
                "text": "pick",
                "reply_markup": { "inline_keyboard": [[{ "text": "A", "callback_data": "a" }]] }
            })
        );
    }
}
