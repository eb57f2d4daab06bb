use std::sync::Arc;

use elsa::{Bot, Broadcaster, Config, DeviceLink, ErasedError, Gateway, Operators, StateHolder};

use log::info;
use tokio::net::TcpListener;
use tokio::signal::unix::{signal, SignalKind};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), ErasedError> {
    pretty_env_logger::init_timed();

    info!("elsa version {VERSION}");

    let config = Config::from_env()?;
    let operators = Operators::new(config.admin, config.allowed_users.iter().copied());

    let api = telegram::Client::new(&config.bot_token)?;
    let state = StateHolder::new();

    let notifier = Arc::new(Broadcaster::new(api.clone(), operators.clone()));
    let link = DeviceLink::new(state.clone(), notifier).with_keepalive(config.keepalive);

    let gateway =
        Gateway::new(link.clone(), state, operators).with_ack_timeout(config.ack_timeout);
    let bot = Bot::new(api, gateway, config.poll_timeout);

    let listener = TcpListener::bind(config.ws_address).await?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = link.listen(listener) => result?,
        result = bot.run() => result?,
        _ = sigterm.recv() => info!("got SIGTERM, exiting..."),
        _ = tokio::signal::ctrl_c() => info!("got SIGINT, exiting..."),
    };

    Ok(())
}
