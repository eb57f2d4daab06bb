use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use log::{debug, error, info, trace, warn};
use tokio::net::TcpListener;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task;
use tokio::time::{self, Instant};
use tokio_tungstenite::tungstenite::{self, Message};

use transport::{InboundEvent, LedState, OutboundCommand};

use crate::{Error, Notifier, Result, StateHolder};

type Writer = Pin<Box<dyn Sink<Message, Error = tungstenite::Error> + Send>>;
type SharedWriter = Arc<AsyncMutex<Writer>>;

/// Interval between pings to an idle device. A device that sends nothing,
/// pongs included, for two intervals is dropped.
pub const DEFAULT_KEEPALIVE: Duration = Duration::from_secs(20);

const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub enum SendError {
    NotConnected,
    Encode(serde_json::Error),
    TransportFailure(tungstenite::Error),
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "device is not connected"),
            Self::Encode(err) => write!(f, "unable to encode command: {err}"),
            Self::TransportFailure(err) => write!(f, "unable to reach device: {err}"),
        }
    }
}

impl std::error::Error for SendError {}

/// Owner of the single device connection.
///
/// At most one device is attached at a time. Writes go through one lock so
/// commands and close frames never interleave; reads happen on the task
/// running [`DeviceLink::run`].
#[derive(Clone)]
pub struct DeviceLink {
    connection: Arc<Mutex<Option<SharedWriter>>>,
    state: StateHolder,
    notifier: Arc<dyn Notifier>,
    keepalive: Duration,
}

impl DeviceLink {
    pub fn new(state: StateHolder, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            connection: Arc::new(Mutex::new(None)),
            state,
            notifier,
            keepalive: DEFAULT_KEEPALIVE,
        }
    }

    pub fn with_keepalive(mut self, keepalive: Duration) -> Self {
        self.keepalive = keepalive;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.connection().is_some()
    }

    /// Pushes a state change to the device. Fails fast when nothing is
    /// attached and never retries.
    pub async fn send(&self, state: LedState) -> std::result::Result<(), SendError> {
        let writer = self.connection().clone().ok_or(SendError::NotConnected)?;

        let text = transport::encode(&OutboundCommand::from(state)).map_err(SendError::Encode)?;

        let mut writer = writer.lock().await;
        writer
            .send(Message::text(text.clone()))
            .await
            .map_err(SendError::TransportFailure)?;

        info!("sent to device: {text}");

        Ok(())
    }

    /// Accepts device connections forever. Each connection is upgraded to a
    /// websocket and served on its own task.
    pub async fn listen(&self, listener: TcpListener) -> Result<()> {
        info!("listening for device on {}", listener.local_addr()?);

        loop {
            let (stream, address) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(err) => {
                    error!("Error accepting device connection: {err}");
                    continue;
                }
            };

            let link = self.clone();

            task::spawn(async move {
                let socket = match tokio_tungstenite::accept_async(stream).await {
                    Ok(socket) => socket,
                    Err(err) => {
                        error!("Error upgrading connection from {address}: {err}");
                        return;
                    }
                };

                debug!("websocket handshake with {address} done");

                match link.run(socket).await {
                    Ok(()) => info!("device {address} disconnected"),
                    Err(err) => error!("device {address} dropped: {err}"),
                }
            });
        }
    }

    /// Serves one device connection until it closes.
    ///
    /// Returns `Error::AlreadyConnected` right away, after closing `socket`,
    /// when another device is attached. A frame that does not decode ends the
    /// connection with `Error::ProtocolViolation`, a device that stops
    /// answering pings with `Error::DeviceUnresponsive`.
    pub async fn run<S>(&self, socket: S) -> Result<()>
    where
        S: Stream<Item = std::result::Result<Message, tungstenite::Error>>
            + Sink<Message, Error = tungstenite::Error>
            + Send
            + 'static,
    {
        let (write, mut read) = socket.split();
        let write: Writer = Box::pin(write);
        let writer: SharedWriter = Arc::new(AsyncMutex::new(write));

        if !self.attach(&writer) {
            warn!("rejecting device connection, another device is connected");
            close(&writer).await;
            return Err(Error::AlreadyConnected);
        }

        info!("device connected");

        let result = self.receive(&mut read, &writer).await;

        self.detach(&writer);
        close(&writer).await;

        result
    }

    /// Applies one device report to the shared state.
    ///
    /// Acks always go through, even when they repeat the current state, since
    /// a pending request waits on them. Unsolicited reports of the current
    /// state are dropped so operators are not told about a non-change.
    ///
    /// Broadcasts run on their own task, the caller never waits on them.
    pub fn handle_event(&self, event: InboundEvent) {
        match event {
            InboundEvent::DeviceAck { state } => {
                debug!("device acknowledged {state}");
                self.state.change_state(state);
            }
            InboundEvent::DeviceInitiated { state } => {
                if self.state.current() == state {
                    trace!("device reported unchanged state {state}");
                    return;
                }

                info!("device changed state to {state}");
                self.state.change_state(state);

                let notifier = self.notifier.clone();
                task::spawn(async move { notifier.broadcast(state).await });
            }
        }
    }

    async fn receive<R>(&self, read: &mut R, writer: &SharedWriter) -> Result<()>
    where
        R: Stream<Item = std::result::Result<Message, tungstenite::Error>> + Unpin,
    {
        let mut keepalive = time::interval_at(Instant::now() + self.keepalive, self.keepalive);
        let mut last_seen = Instant::now();

        loop {
            let message = tokio::select! {
                message = read.next() => message,
                _ = keepalive.tick() => {
                    if last_seen.elapsed() >= self.keepalive * 2 {
                        warn!("device silent for {:?}", last_seen.elapsed());
                        return Err(Error::DeviceUnresponsive);
                    }

                    ping(writer, self.keepalive).await?;
                    continue;
                }
            };

            let message = match message {
                Some(message) => message?,
                None => break,
            };

            last_seen = Instant::now();

            let event = match message {
                Message::Text(text) => {
                    debug!("received from device: {}", text.as_str());
                    transport::decode(text.as_bytes())
                }
                Message::Binary(payload) => {
                    debug!("received {} bytes from device", payload.len());
                    transport::decode(&payload)
                }
                Message::Close(frame) => {
                    debug!("device closed connection: {:?}", frame);
                    break;
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            };

            let event = event.map_err(Error::ProtocolViolation)?;
            self.handle_event(event);
        }

        Ok(())
    }

    fn attach(&self, writer: &SharedWriter) -> bool {
        let mut connection = self.connection();

        if connection.is_some() {
            return false;
        }

        *connection = Some(writer.clone());
        true
    }

    fn detach(&self, writer: &SharedWriter) {
        let mut connection = self.connection();

        if let Some(current) = connection.as_ref() {
            if Arc::ptr_eq(current, writer) {
                *connection = None;
            }
        }
    }

    fn connection(&self) -> MutexGuard<'_, Option<SharedWriter>> {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

async fn ping(writer: &SharedWriter, bound: Duration) -> Result<()> {
    let ping = async {
        let mut writer = writer.lock().await;
        writer.send(Message::Ping(Default::default())).await
    };

    match time::timeout(bound, ping).await {
        Ok(result) => {
            result?;
            trace!("pinged device");
            Ok(())
        }
        Err(_) => Err(Error::DeviceUnresponsive),
    }
}

async fn close(writer: &SharedWriter) {
    let close = async {
        let mut writer = writer.lock().await;
        writer.close().await
    };

    match time::timeout(CLOSE_TIMEOUT, close).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => trace!("close: {err}"),
        Err(_) => trace!("close: timed out"),
    }
}
