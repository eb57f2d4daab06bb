use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::io::DuplexStream;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_tungstenite::tungstenite::protocol::Role;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use transport::LedState;

use crate::{DeviceLink, Notifier, Result};

pub type Socket = WebSocketStream<DuplexStream>;

const CAPACITY: usize = 4096;

/// Gateway end first, device end second.
pub async fn socket_pair() -> (Socket, Socket) {
    socket_pair_with_capacity(CAPACITY).await
}

/// A pair whose buffer holds at most `capacity` unread bytes in each
/// direction.
pub async fn socket_pair_with_capacity(capacity: usize) -> (Socket, Socket) {
    let (server, client) = tokio::io::duplex(capacity);

    let server = WebSocketStream::from_raw_socket(server, Role::Server, None).await;
    let client = WebSocketStream::from_raw_socket(client, Role::Client, None).await;

    (server, client)
}

/// Attaches a fresh device to `link` and returns the task serving it along
/// with the device end of the socket.
pub async fn connect(link: &DeviceLink) -> (JoinHandle<Result<()>>, Socket) {
    connect_with_capacity(link, CAPACITY).await
}

pub async fn connect_with_capacity(
    link: &DeviceLink,
    capacity: usize,
) -> (JoinHandle<Result<()>>, Socket) {
    let (server, client) = socket_pair_with_capacity(capacity).await;

    let served = link.clone();
    let handle = tokio::spawn(async move { served.run(server).await });

    eventually(|| link.is_connected()).await;

    (handle, client)
}

pub async fn eventually<F: Fn() -> bool>(condition: F) {
    let deadline = Instant::now() + Duration::from_secs(1);

    while !condition() {
        assert!(Instant::now() < deadline, "condition not met in time");
        time::sleep(Duration::from_millis(5)).await;
    }
}

pub fn text_frame(text: &str) -> Message {
    Message::text(text.to_string())
}

pub async fn next_text(socket: &mut Socket) -> String {
    loop {
        match socket.next().await {
            Some(Ok(Message::Text(text))) => return text.as_str().to_string(),
            Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
            other => panic!("expected a text frame, got {:?}", other),
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    broadcasts: Mutex<Vec<LedState>>,
}

impl RecordingNotifier {
    pub fn broadcasts(&self) -> Vec<LedState> {
        self.broadcasts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn broadcast(&self, state: LedState) {
        self.broadcasts.lock().unwrap().push(state);
    }
}

/// Spends `.0` on every broadcast.
pub struct SlowNotifier(pub Duration);

#[async_trait]
impl Notifier for SlowNotifier {
    async fn broadcast(&self, _state: LedState) {
        time::sleep(self.0).await;
    }
}
