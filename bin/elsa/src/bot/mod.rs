mod texts;

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info, warn};
use telegram::{CallbackQuery, ChatId, Message, MessageId, Update};
use tokio::{task, time};

use transport::LedState;

use crate::{Gateway, Messenger, Result, UserId};

/// Telegram front end: `/start` shows a keyboard, a button press requests a
/// state change and reports the outcome in place of the keyboard.
#[derive(Clone)]
pub struct Bot {
    api: telegram::Client,
    gateway: Gateway,
    poll_timeout: u64,
    prompts: Arc<Mutex<HashMap<ChatId, MessageId>>>,
}

impl Bot {
    pub fn new(api: telegram::Client, gateway: Gateway, poll_timeout: u64) -> Self {
        Self {
            api,
            gateway,
            poll_timeout,
            prompts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let mut offset = None;

        info!("polling telegram updates");

        loop {
            let updates = match self.api.get_updates(offset, self.poll_timeout).await {
                Ok(updates) => updates,
                Err(err) => {
                    error!("Error polling telegram: {err}");
                    time::sleep(Duration::from_secs(1)).await;
                    continue;
                }
            };

            for update in updates {
                offset = Some(update.update_id + 1);

                let bot = self.clone();
                task::spawn(async move { bot.handle_update(update).await });
            }
        }
    }

    async fn handle_update(&self, update: Update) {
        let update_id = update.update_id;

        let result = if let Some(query) = update.callback_query {
            self.handle_callback(query).await
        } else if let Some(message) = update.message {
            match message.command() {
                Some("start") => self.handle_start(message).await,
                _ => Ok(()),
            }
        } else {
            Ok(())
        };

        if let Err(err) = result {
            error!("Error handling update {update_id}: {err}");
        }
    }

    async fn handle_start(&self, message: Message) -> Result<()> {
        let chat_id = message.chat.id;
        let user = match message.from {
            Some(user) => user.id,
            None => return Ok(()),
        };

        if let Err(err) = self.gateway.authorize(user) {
            warn!("{err}, chat {chat_id}");
            self.api.send_message(chat_id, texts::NOT_ALLOWED, None).await?;
            return Ok(());
        }

        if !self.gateway.is_device_connected() {
            self.api
                .send_message(chat_id, texts::DEVICE_OFFLINE, None)
                .await?;
            return Ok(());
        }

        let previous = self.prompts().remove(&chat_id);
        if let Some(previous) = previous {
            if let Err(err) = self.api.delete_message(chat_id, previous).await {
                debug!("unable to delete prompt {previous} in chat {chat_id}: {err}");
            }
        }

        let text = texts::prompt(self.gateway.current_state());
        let keyboard = texts::keyboard();
        let prompt = self
            .api
            .send_message(chat_id, &text, Some(&keyboard))
            .await?;

        self.prompts().insert(chat_id, prompt.message_id);

        Ok(())
    }

    async fn handle_callback(&self, query: CallbackQuery) -> Result<()> {
        if let Err(err) = self.api.answer_callback_query(&query.id).await {
            debug!("unable to answer callback query {}: {err}", query.id);
        }

        let message = match query.message {
            Some(message) => message,
            None => return Ok(()),
        };
        let chat_id = message.chat.id;

        let text = match query.data.as_deref().map(LedState::from_str) {
            Some(Ok(target)) => {
                let result = self.gateway.request_change_as(query.from.id, target).await;
                texts::change_result(target, &result)
            }
            _ => {
                warn!("unsupported callback data {:?}", query.data);
                texts::UNSUPPORTED.to_string()
            }
        };

        self.prompts().remove(&chat_id);

        self.api
            .edit_message_text(chat_id, message.message_id, &text)
            .await?;

        Ok(())
    }

    fn prompts(&self) -> MutexGuard<'_, HashMap<ChatId, MessageId>> {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Messenger for telegram::Client {
    async fn notify(&self, recipient: UserId, state: LedState) -> Result<()> {
        self.send_message(recipient, &texts::state_changed(state), None)
            .await?;

        Ok(())
    }
}
