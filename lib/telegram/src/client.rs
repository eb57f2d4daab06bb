use std::sync::Arc;

use chipp_http::{HttpClient, HttpMethod, NoInterceptor};
use log::trace;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{
    AnswerCallbackQuery, ChatId, DeleteMessage, EditMessageText, GetUpdates,
    InlineKeyboardMarkup, Message, MessageId, Response, Result, SendMessage, Update,
};

const ALLOWED_UPDATES: &[&str] = &["message", "callback_query"];

#[derive(Clone)]
pub struct Client {
    http_client: Arc<HttpClient<NoInterceptor>>,
}

impl Client {
    pub fn new(token: &str) -> Result<Client> {
        let base_url = format!("https://api.telegram.org/bot{token}");
        let http_client = HttpClient::new(base_url.as_str())?;

        Ok(Client {
            http_client: Arc::new(http_client),
        })
    }

    /// Long polls for updates newer than `offset`, waiting at most `timeout`
    /// seconds on the server side.
    pub async fn get_updates(&self, offset: Option<i64>, timeout: u64) -> Result<Vec<Update>> {
        let request = GetUpdates {
            offset,
            timeout,
            allowed_updates: ALLOWED_UPDATES,
        };

        self.call("getUpdates", &request).await
    }

    pub async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message> {
        let request = SendMessage {
            chat_id,
            text,
            reply_markup,
        };

        self.call("sendMessage", &request).await
    }

    pub async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> Result<()> {
        let request = EditMessageText {
            chat_id,
            message_id,
            text,
        };

        // result is either the edited message or `true`
        let _: serde_json::Value = self.call("editMessageText", &request).await?;
        Ok(())
    }

    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<()> {
        let request = AnswerCallbackQuery { callback_query_id };

        let _: bool = self.call("answerCallbackQuery", &request).await?;
        Ok(())
    }

    pub async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<()> {
        let request = DeleteMessage {
            chat_id,
            message_id,
        };

        let _: bool = self.call("deleteMessage", &request).await?;
        Ok(())
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned + Send + 'static,
    {
        let mut request = self.http_client.new_request([method]);
        request.set_method(HttpMethod::Post);
        request.set_json_body(body);

        trace!("calling {method}");

        let response: Response<T> = self
            .http_client
            .perform_request(request, chipp_http::json::parse_json)
            .await?;

        response.into_result()
    }
}
