use serde::Serialize;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineKeyboardButton {
    pub fn new<T: Into<String>, D: Into<String>>(text: T, callback_data: D) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

impl From<Vec<Vec<InlineKeyboardButton>>> for InlineKeyboardMarkup {
    fn from(inline_keyboard: Vec<Vec<InlineKeyboardButton>>) -> Self {
        Self { inline_keyboard }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialization() {
        let keyboard = InlineKeyboardMarkup::from(vec![
            vec![
                InlineKeyboardButton::new("One", "1"),
                InlineKeyboardButton::new("Two", "2"),
            ],
            vec![InlineKeyboardButton::new("Three", "3")],
        ]);

        assert_eq!(
            serde_json::to_value(&keyboard).unwrap(),
            json!({
                "inline_keyboard": [
                    [
                        { "text": "One", "callback_data": "1" },
                        { "text": "Two", "callback_data": "2" }
                    ],
                    [
                        { "text": "Three", "callback_data": "3" }
                    ]
                ]
            })
        );
    }
}
